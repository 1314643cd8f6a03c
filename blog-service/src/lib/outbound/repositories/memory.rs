use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::documents::author_patch;
use super::documents::ArticleDocument;
use super::documents::AuthorDocument;
use crate::article::errors::ArticleError;
use crate::article::models::Article;
use crate::article::models::ArticleId;
use crate::article::ports::ArticleRepository;
use crate::author::errors::AuthorError;
use crate::author::models::Author;
use crate::author::models::AuthorChanges;
use crate::author::models::AuthorId;
use crate::author::ports::AuthorRepository;

#[derive(Debug, Clone)]
struct StoredDocument {
    id: String,
    kind: &'static str,
    body: Value,
}

/// Process-local document store for development runs and tests.
///
/// Documents are kept in insertion order; listing returns them oldest first.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw body of the document `id`, whatever its kind.
    pub async fn raw_document(&self, id: &str) -> Option<Value> {
        self.documents
            .read()
            .await
            .iter()
            .find(|document| document.id == id)
            .map(|document| document.body.clone())
    }
}

fn encode<T: Serialize>(document: &T) -> Result<Value, String> {
    serde_json::to_value(document).map_err(|e| e.to_string())
}

fn decode<T: DeserializeOwned>(body: &Value) -> Result<T, String> {
    serde_json::from_value(body.clone()).map_err(|e| e.to_string())
}

fn has_username(document: &StoredDocument, username: &str) -> bool {
    document.kind == Author::KIND
        && document.body.get("username").and_then(Value::as_str) == Some(username)
}

fn author_from(body: &Value) -> Result<Author, AuthorError> {
    decode::<AuthorDocument>(body)
        .map_err(AuthorError::StoreError)
        .and_then(Author::try_from)
}

fn article_from(body: &Value) -> Result<Article, ArticleError> {
    decode::<ArticleDocument>(body)
        .map_err(ArticleError::StoreError)
        .and_then(Article::try_from)
}

#[async_trait]
impl AuthorRepository for InMemoryDocumentStore {
    async fn create(&self, author: Author) -> Result<Author, AuthorError> {
        let body = encode(&AuthorDocument::from(&author)).map_err(AuthorError::StoreError)?;
        let mut documents = self.documents.write().await;

        if documents
            .iter()
            .any(|document| has_username(document, author.username.as_str()))
        {
            return Err(AuthorError::UsernameAlreadyExists(
                author.username.as_str().to_string(),
            ));
        }

        documents.push(StoredDocument {
            id: author.id.to_string(),
            kind: Author::KIND,
            body,
        });

        Ok(author)
    }

    async fn find_by_id(&self, id: &AuthorId) -> Result<Option<Author>, AuthorError> {
        let id = id.to_string();
        let documents = self.documents.read().await;

        documents
            .iter()
            .find(|document| document.kind == Author::KIND && document.id == id)
            .map(|document| author_from(&document.body))
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Author>, AuthorError> {
        let documents = self.documents.read().await;

        documents
            .iter()
            .filter(|document| has_username(document, username))
            .map(|document| author_from(&document.body))
            .collect()
    }

    async fn list_all(&self) -> Result<Vec<Author>, AuthorError> {
        let documents = self.documents.read().await;

        documents
            .iter()
            .filter(|document| document.kind == Author::KIND)
            .map(|document| author_from(&document.body))
            .collect()
    }

    async fn update(&self, id: &AuthorId, changes: AuthorChanges) -> Result<Author, AuthorError> {
        let id = id.to_string();
        let mut documents = self.documents.write().await;

        if let Some(username) = &changes.username {
            if documents
                .iter()
                .any(|document| document.id != id && has_username(document, username.as_str()))
            {
                return Err(AuthorError::UsernameAlreadyExists(
                    username.as_str().to_string(),
                ));
            }
        }

        let document = documents
            .iter_mut()
            .find(|document| document.kind == Author::KIND && document.id == id)
            .ok_or_else(|| AuthorError::NotFound(id.clone()))?;

        let Value::Object(body) = &mut document.body else {
            return Err(AuthorError::StoreError(format!(
                "Corrupt author document {}: body is not an object",
                id
            )));
        };
        body.extend(author_patch(&changes));

        author_from(&document.body)
    }

    async fn delete(&self, id: &AuthorId) -> Result<(), AuthorError> {
        let id = id.to_string();
        let mut documents = self.documents.write().await;

        let position = documents
            .iter()
            .position(|document| document.kind == Author::KIND && document.id == id)
            .ok_or_else(|| AuthorError::NotFound(id.clone()))?;
        documents.remove(position);

        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryDocumentStore {
    async fn create(&self, article: Article) -> Result<Article, ArticleError> {
        let body = encode(&ArticleDocument::from(&article)).map_err(ArticleError::StoreError)?;

        self.documents.write().await.push(StoredDocument {
            id: article.id.to_string(),
            kind: Article::KIND,
            body,
        });

        Ok(article)
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleError> {
        let id = id.to_string();
        let documents = self.documents.read().await;

        documents
            .iter()
            .find(|document| document.kind == Article::KIND && document.id == id)
            .map(|document| article_from(&document.body))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Article>, ArticleError> {
        let documents = self.documents.read().await;

        documents
            .iter()
            .filter(|document| document.kind == Article::KIND)
            .map(|document| article_from(&document.body))
            .collect()
    }
}
