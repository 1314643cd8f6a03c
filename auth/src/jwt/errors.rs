use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures collapse into `Rejected` so callers cannot tell a bad
/// signature from an expired token or a foreign issuer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid or expired token")]
    Rejected,
}
