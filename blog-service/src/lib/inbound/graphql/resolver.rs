use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use super::context::RequestContext;
use crate::article::errors::ArticleError;
use crate::author::errors::AuthorError;

/// Errors a resolver reports in the `errors` list of a response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error")]
    Internal(String),
}

impl From<AuthorError> for ResolverError {
    fn from(err: AuthorError) -> Self {
        match err {
            AuthorError::NotFound(_) => ResolverError::NotFound(err.to_string()),
            AuthorError::UsernameAlreadyExists(_) => ResolverError::Conflict(err.to_string()),
            AuthorError::InvalidCredentials => ResolverError::Unauthorized,
            AuthorError::InvalidAuthorId(_)
            | AuthorError::InvalidUsername(_)
            | AuthorError::InvalidPassword(_)
            | AuthorError::MissingField(_) => ResolverError::InvalidArguments(err.to_string()),
            AuthorError::Password(_) | AuthorError::Token(_) | AuthorError::StoreError(_) => {
                ResolverError::Internal(err.to_string())
            }
        }
    }
}

impl From<ArticleError> for ResolverError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::NotFound(_) => ResolverError::NotFound(err.to_string()),
            ArticleError::InvalidArticleId(_) | ArticleError::MissingField(_) => {
                ResolverError::InvalidArguments(err.to_string())
            }
            ArticleError::StoreError(_) => ResolverError::Internal(err.to_string()),
        }
    }
}

/// Bound arguments of a root field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(arguments: Map<String, Value>) -> Self {
        Self(arguments)
    }

    /// # Errors
    /// * `InvalidArguments` - Argument is absent, null or not a string
    pub fn required_str(&self, name: &str) -> Result<&str, ResolverError> {
        match self.0.get(name) {
            Some(Value::String(value)) => Ok(value.as_str()),
            Some(Value::Null) | None => Err(ResolverError::InvalidArguments(format!(
                "Missing required argument: {}",
                name
            ))),
            Some(_) => Err(ResolverError::InvalidArguments(format!(
                "Argument {} must be a string",
                name
            ))),
        }
    }

    /// Deserialize an input-object argument.
    ///
    /// # Errors
    /// * `InvalidArguments` - Argument is absent or does not match `T`
    pub fn object<T: DeserializeOwned>(&self, name: &str) -> Result<T, ResolverError> {
        let value = self.0.get(name).cloned().ok_or_else(|| {
            ResolverError::InvalidArguments(format!("Missing required argument: {}", name))
        })?;

        serde_json::from_value(value)
            .map_err(|e| ResolverError::InvalidArguments(format!("Argument {}: {}", name, e)))
    }
}

/// Serves one root field.
///
/// Implementations own the services they need; the schema owns the
/// implementations.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    async fn resolve(
        &self,
        context: &RequestContext,
        arguments: Arguments,
    ) -> Result<Value, ResolverError>;
}
