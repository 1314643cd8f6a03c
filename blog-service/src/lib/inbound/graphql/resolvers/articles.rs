use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::to_value;
use crate::article::models::ArticleId;
use crate::article::models::CreateArticleCommand;
use crate::article::ports::ArticleServicePort;
use crate::inbound::graphql::context::RequestContext;
use crate::inbound::graphql::gate::Capability;
use crate::inbound::graphql::gate::ResolverGate;
use crate::inbound::graphql::resolver::Arguments;
use crate::inbound::graphql::resolver::Resolver;
use crate::inbound::graphql::resolver::ResolverError;
use crate::inbound::messages::ArticleData;

/// `articles`
pub struct ArticlesResolver {
    article_service: Arc<dyn ArticleServicePort>,
}

impl ArticlesResolver {
    pub fn new(article_service: Arc<dyn ArticleServicePort>) -> Self {
        Self { article_service }
    }
}

#[async_trait]
impl Resolver for ArticlesResolver {
    async fn resolve(
        &self,
        _context: &RequestContext,
        _arguments: Arguments,
    ) -> Result<Value, ResolverError> {
        let articles = self.article_service.list_articles().await?;
        to_value(articles.iter().map(ArticleData::from).collect::<Vec<_>>())
    }
}

/// `article(id)`
pub struct ArticleResolver {
    article_service: Arc<dyn ArticleServicePort>,
}

impl ArticleResolver {
    pub fn new(article_service: Arc<dyn ArticleServicePort>) -> Self {
        Self { article_service }
    }
}

#[async_trait]
impl Resolver for ArticleResolver {
    async fn resolve(
        &self,
        _context: &RequestContext,
        arguments: Arguments,
    ) -> Result<Value, ResolverError> {
        let id = ArticleId::from_string(arguments.required_str("id")?)
            .map_err(|e| ResolverError::InvalidArguments(e.to_string()))?;
        let article = self.article_service.get_article(&id).await?;
        to_value(ArticleData::from(&article))
    }
}

/// `article` argument of `createArticle`. Any author field sent by the
/// client is ignored.
#[derive(Debug, Deserialize)]
struct ArticleInput {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

/// `createArticle(article)`: publishes as the token's subject.
pub struct CreateArticleResolver {
    article_service: Arc<dyn ArticleServicePort>,
    gate: ResolverGate,
}

impl CreateArticleResolver {
    pub fn new(article_service: Arc<dyn ArticleServicePort>, gate: ResolverGate) -> Self {
        Self {
            article_service,
            gate,
        }
    }
}

#[async_trait]
impl Resolver for CreateArticleResolver {
    async fn resolve(
        &self,
        context: &RequestContext,
        arguments: Arguments,
    ) -> Result<Value, ResolverError> {
        let author_id = self.gate.authorize(context, Capability::CreateArticle)?;

        let input: ArticleInput = arguments.object("article")?;
        let command = CreateArticleCommand::new(input.title, input.content)?;

        let article = self
            .article_service
            .create_article(author_id, command)
            .await?;

        to_value(ArticleData::from(&article))
    }
}

#[cfg(test)]
mod tests {
    use auth::Authenticator;
    use auth::TokenIssuer;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;
    use serde_json::json;

    use super::*;
    use crate::article::errors::ArticleError;
    use crate::article::models::Article;
    use crate::author::models::AuthorId;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
    const ISSUER: &str = "blog-service";

    mock! {
        pub TestArticleService {}

        #[async_trait]
        impl ArticleServicePort for TestArticleService {
            async fn list_articles(&self) -> Result<Vec<Article>, ArticleError>;
            async fn get_article(&self, id: &ArticleId) -> Result<Article, ArticleError>;
            async fn create_article(&self, author_id: AuthorId, command: CreateArticleCommand) -> Result<Article, ArticleError>;
        }
    }

    fn resolver(service: MockTestArticleService) -> CreateArticleResolver {
        let gate = ResolverGate::new(Arc::new(Authenticator::new(SECRET, ISSUER)));
        CreateArticleResolver::new(Arc::new(service), gate)
    }

    fn article_arguments() -> Arguments {
        match json!({"article": {"title": "Hello", "content": "World", "author": "someone-else"}}) {
            Value::Object(map) => Arguments::new(map),
            _ => Arguments::default(),
        }
    }

    #[tokio::test]
    async fn test_create_article_without_token() {
        let mut service = MockTestArticleService::new();
        service.expect_create_article().times(0);

        let result = resolver(service)
            .resolve(&RequestContext::anonymous(), article_arguments())
            .await;

        assert_eq!(result, Err(ResolverError::Unauthorized));
    }

    #[tokio::test]
    async fn test_create_article_with_expired_token() {
        let mut service = MockTestArticleService::new();
        service.expect_create_article().times(0);

        let token = TokenIssuer::new(SECRET, ISSUER)
            .issue_at(AuthorId::new(), Utc::now() - Duration::minutes(61))
            .unwrap();

        let result = resolver(service)
            .resolve(&RequestContext::new(Some(token)), article_arguments())
            .await;

        assert_eq!(result, Err(ResolverError::Unauthorized));
    }

    #[tokio::test]
    async fn test_create_article_as_token_subject() {
        let author_id = AuthorId::new();
        let mut service = MockTestArticleService::new();
        service
            .expect_create_article()
            .withf(move |id, command| *id == author_id && command.title == "Hello")
            .times(1)
            .returning(|author_id, command| {
                Ok(Article {
                    id: ArticleId::new(),
                    author_id,
                    title: command.title,
                    content: command.content,
                })
            });

        let token = TokenIssuer::new(SECRET, ISSUER).issue(author_id).unwrap();

        let value = resolver(service)
            .resolve(&RequestContext::new(Some(token)), article_arguments())
            .await
            .unwrap();

        assert_eq!(value["author"], author_id.to_string());
        assert_eq!(value["type"], "article");
    }

    #[tokio::test]
    async fn test_create_article_requires_title() {
        let author_id = AuthorId::new();
        let mut service = MockTestArticleService::new();
        service.expect_create_article().times(0);

        let token = TokenIssuer::new(SECRET, ISSUER).issue(author_id).unwrap();
        let arguments = match json!({"article": {"content": "World"}}) {
            Value::Object(map) => Arguments::new(map),
            _ => Arguments::default(),
        };

        let result = resolver(service)
            .resolve(&RequestContext::new(Some(token)), arguments)
            .await;

        assert!(matches!(result, Err(ResolverError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_article_not_found() {
        let mut service = MockTestArticleService::new();
        service
            .expect_get_article()
            .times(1)
            .returning(|id| Err(ArticleError::NotFound(id.to_string())));

        let resolver = ArticleResolver::new(Arc::new(service));
        let arguments = match json!({"id": ArticleId::new().to_string()}) {
            Value::Object(map) => Arguments::new(map),
            _ => Arguments::default(),
        };

        let result = resolver
            .resolve(&RequestContext::anonymous(), arguments)
            .await;

        assert!(matches!(result, Err(ResolverError::NotFound(_))));
    }
}
