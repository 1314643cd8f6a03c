use async_trait::async_trait;

use crate::article::errors::ArticleError;
use crate::article::models::Article;
use crate::article::models::ArticleId;
use crate::article::models::CreateArticleCommand;
use crate::author::models::AuthorId;

/// Port for article domain service operations.
#[async_trait]
pub trait ArticleServicePort: Send + Sync + 'static {
    async fn list_articles(&self) -> Result<Vec<Article>, ArticleError>;

    /// # Errors
    /// * `NotFound` - Article does not exist
    /// * `StoreError` - Store operation failed
    async fn get_article(&self, id: &ArticleId) -> Result<Article, ArticleError>;

    /// Publish an article on behalf of an already authorized author.
    ///
    /// # Arguments
    /// * `author_id` - Verified subject of the caller's token
    /// * `command` - Validated title and content
    async fn create_article(
        &self,
        author_id: AuthorId,
        command: CreateArticleCommand,
    ) -> Result<Article, ArticleError>;
}

/// Persistence operations for the article aggregate.
#[async_trait]
pub trait ArticleRepository: Send + Sync + 'static {
    async fn create(&self, article: Article) -> Result<Article, ArticleError>;

    /// # Returns
    /// Optional article entity (None if not found)
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleError>;

    async fn list_all(&self) -> Result<Vec<Article>, ArticleError>;
}
