use thiserror::Error;

/// Error for AuthorId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Top-level error for all author-related operations
#[derive(Debug, Clone, Error)]
pub enum AuthorError {
    // Validation errors
    #[error("Invalid author ID: {0}")]
    InvalidAuthorId(#[from] AuthorIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    // Domain-level errors
    #[error("Author not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::TokenError),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl AuthorError {
    /// True for errors caused by malformed input, raised before any side effect.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AuthorError::InvalidAuthorId(_)
                | AuthorError::InvalidUsername(_)
                | AuthorError::InvalidPassword(_)
                | AuthorError::MissingField(_)
        )
    }
}
