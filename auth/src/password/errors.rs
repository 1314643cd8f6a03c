use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored value is not a hash produced by this scheme.
    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
