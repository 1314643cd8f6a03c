use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

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

/// Unique index over `body->>'username'` for author documents.
const AUTHOR_USERNAME_CONSTRAINT: &str = "documents_author_username_key";

/// Document store on a PostgreSQL `documents` table with JSONB bodies.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_username_conflict(e: &sqlx::Error) -> bool {
    e.as_database_error().is_some_and(|db_err| {
        db_err.is_unique_violation() && db_err.constraint() == Some(AUTHOR_USERNAME_CONSTRAINT)
    })
}

fn author_store_error(e: sqlx::Error) -> AuthorError {
    AuthorError::StoreError(e.to_string())
}

fn article_store_error(e: sqlx::Error) -> ArticleError {
    ArticleError::StoreError(e.to_string())
}

#[async_trait]
impl AuthorRepository for PostgresDocumentStore {
    async fn create(&self, author: Author) -> Result<Author, AuthorError> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, kind, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(author.id.to_string())
        .bind(Author::KIND)
        .bind(Json(AuthorDocument::from(&author)))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_username_conflict(&e) {
                return AuthorError::UsernameAlreadyExists(author.username.as_str().to_string());
            }
            author_store_error(e)
        })?;

        Ok(author)
    }

    async fn find_by_id(&self, id: &AuthorId) -> Result<Option<Author>, AuthorError> {
        let body = sqlx::query_scalar::<_, Json<AuthorDocument>>(
            r#"
            SELECT body
            FROM documents
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(id.to_string())
        .bind(Author::KIND)
        .fetch_optional(&self.pool)
        .await
        .map_err(author_store_error)?;

        body.map(|Json(document)| Author::try_from(document))
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Author>, AuthorError> {
        let bodies = sqlx::query_scalar::<_, Json<AuthorDocument>>(
            r#"
            SELECT body
            FROM documents
            WHERE kind = $1 AND body->>'username' = $2
            ORDER BY created_at
            "#,
        )
        .bind(Author::KIND)
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(author_store_error)?;

        bodies
            .into_iter()
            .map(|Json(document)| Author::try_from(document))
            .collect()
    }

    async fn list_all(&self) -> Result<Vec<Author>, AuthorError> {
        let bodies = sqlx::query_scalar::<_, Json<AuthorDocument>>(
            r#"
            SELECT body
            FROM documents
            WHERE kind = $1
            ORDER BY created_at
            "#,
        )
        .bind(Author::KIND)
        .fetch_all(&self.pool)
        .await
        .map_err(author_store_error)?;

        bodies
            .into_iter()
            .map(|Json(document)| Author::try_from(document))
            .collect()
    }

    async fn update(&self, id: &AuthorId, changes: AuthorChanges) -> Result<Author, AuthorError> {
        // `||` merges top-level keys, so each provided field is upserted on its own.
        let body = sqlx::query_scalar::<_, Json<AuthorDocument>>(
            r#"
            UPDATE documents
            SET body = body || $3
            WHERE id = $1 AND kind = $2
            RETURNING body
            "#,
        )
        .bind(id.to_string())
        .bind(Author::KIND)
        .bind(Json(Value::Object(author_patch(&changes))))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_username_conflict(&e) {
                let username = changes
                    .username
                    .as_ref()
                    .map(|username| username.as_str().to_string())
                    .unwrap_or_default();
                return AuthorError::UsernameAlreadyExists(username);
            }
            author_store_error(e)
        })?;

        match body {
            Some(Json(document)) => Author::try_from(document),
            None => Err(AuthorError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &AuthorId) -> Result<(), AuthorError> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(id.to_string())
        .bind(Author::KIND)
        .execute(&self.pool)
        .await
        .map_err(author_store_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthorError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for PostgresDocumentStore {
    async fn create(&self, article: Article) -> Result<Article, ArticleError> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, kind, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(article.id.to_string())
        .bind(Article::KIND)
        .bind(Json(ArticleDocument::from(&article)))
        .execute(&self.pool)
        .await
        .map_err(article_store_error)?;

        Ok(article)
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleError> {
        let body = sqlx::query_scalar::<_, Json<ArticleDocument>>(
            r#"
            SELECT body
            FROM documents
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(id.to_string())
        .bind(Article::KIND)
        .fetch_optional(&self.pool)
        .await
        .map_err(article_store_error)?;

        body.map(|Json(document)| Article::try_from(document))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Article>, ArticleError> {
        let bodies = sqlx::query_scalar::<_, Json<ArticleDocument>>(
            r#"
            SELECT body
            FROM documents
            WHERE kind = $1
            ORDER BY created_at
            "#,
        )
        .bind(Article::KIND)
        .fetch_all(&self.pool)
        .await
        .map_err(article_store_error)?;

        bodies
            .into_iter()
            .map(|Json(document)| Article::try_from(document))
            .collect()
    }
}
