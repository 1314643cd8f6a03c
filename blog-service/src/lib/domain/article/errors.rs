use thiserror::Error;

/// Error for ArticleId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArticleIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all article-related operations
#[derive(Debug, Clone, Error)]
pub enum ArticleError {
    #[error("Invalid article ID: {0}")]
    InvalidArticleId(#[from] ArticleIdError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Article not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    StoreError(String),
}
