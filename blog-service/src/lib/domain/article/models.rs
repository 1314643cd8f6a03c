use std::fmt;

use uuid::Uuid;

use crate::article::errors::ArticleError;
use crate::article::errors::ArticleIdError;
use crate::author::models::AuthorId;

/// Article aggregate entity.
///
/// `author_id` always comes from a verified token subject, never from the
/// request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub author_id: AuthorId,
    pub title: String,
    pub content: String,
}

impl Article {
    /// Kind tag of article documents in the store.
    pub const KIND: &'static str = "article";
}

/// Article unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArticleId(pub Uuid);

impl ArticleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ArticleIdError> {
        Uuid::parse_str(s)
            .map(ArticleId)
            .map_err(|e| ArticleIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ArticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to publish a new article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArticleCommand {
    pub title: String,
    pub content: String,
}

impl CreateArticleCommand {
    /// # Errors
    /// * `MissingField` - Title or content is empty
    pub fn new(title: String, content: String) -> Result<Self, ArticleError> {
        if title.trim().is_empty() {
            return Err(ArticleError::MissingField("title"));
        }
        if content.trim().is_empty() {
            return Err(ArticleError::MissingField("content"));
        }
        Ok(Self { title, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_article_command_requires_title_and_content() {
        assert!(matches!(
            CreateArticleCommand::new(String::new(), "body".to_string()),
            Err(ArticleError::MissingField("title"))
        ));
        assert!(matches!(
            CreateArticleCommand::new("Title".to_string(), "  ".to_string()),
            Err(ArticleError::MissingField("content"))
        ));
        assert!(CreateArticleCommand::new("Title".to_string(), "body".to_string()).is_ok());
    }

    #[test]
    fn test_article_id_parse() {
        let id = ArticleId::new();
        assert_eq!(ArticleId::from_string(&id.to_string()), Ok(id));
        assert!(matches!(
            ArticleId::from_string("42"),
            Err(ArticleIdError::InvalidFormat(_))
        ));
    }
}
