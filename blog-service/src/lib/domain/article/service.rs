use std::sync::Arc;

use async_trait::async_trait;

use crate::article::errors::ArticleError;
use crate::article::models::Article;
use crate::article::models::ArticleId;
use crate::article::models::CreateArticleCommand;
use crate::article::ports::ArticleRepository;
use crate::article::ports::ArticleServicePort;
use crate::author::models::AuthorId;

/// Domain service implementation for article operations.
pub struct ArticleService<AR>
where
    AR: ArticleRepository,
{
    repository: Arc<AR>,
}

impl<AR> ArticleService<AR>
where
    AR: ArticleRepository,
{
    pub fn new(repository: Arc<AR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<AR> ArticleServicePort for ArticleService<AR>
where
    AR: ArticleRepository,
{
    async fn list_articles(&self) -> Result<Vec<Article>, ArticleError> {
        self.repository.list_all().await
    }

    async fn get_article(&self, id: &ArticleId) -> Result<Article, ArticleError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ArticleError::NotFound(id.to_string()))
    }

    async fn create_article(
        &self,
        author_id: AuthorId,
        command: CreateArticleCommand,
    ) -> Result<Article, ArticleError> {
        let article = Article {
            id: ArticleId::new(),
            author_id,
            title: command.title,
            content: command.content,
        };

        let created_article = self.repository.create(article).await?;

        tracing::info!(
            article_id = %created_article.id,
            author_id = %created_article.author_id,
            "Article created"
        );

        Ok(created_article)
    }
}
