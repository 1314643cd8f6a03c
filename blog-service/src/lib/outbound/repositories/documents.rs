//! JSON bodies of stored documents.
//!
//! Both stores persist these shapes, so a document written by one reads the
//! same in the other. Author bodies keep the password hash under `password`.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::article::errors::ArticleError;
use crate::article::models::Article;
use crate::article::models::ArticleId;
use crate::author::errors::AuthorError;
use crate::author::models::Author;
use crate::author::models::AuthorChanges;
use crate::author::models::AuthorId;
use crate::author::models::Username;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDocument {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Author> for AuthorDocument {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id.to_string(),
            firstname: author.first_name.clone(),
            lastname: author.last_name.clone(),
            username: author.username.as_str().to_string(),
            password: author.password_hash.clone(),
            kind: Author::KIND.to_string(),
        }
    }
}

impl TryFrom<AuthorDocument> for Author {
    type Error = AuthorError;

    fn try_from(document: AuthorDocument) -> Result<Self, Self::Error> {
        let id = AuthorId::from_string(&document.id).map_err(|e| {
            AuthorError::StoreError(format!("Corrupt author document {}: {}", document.id, e))
        })?;
        let username = Username::new(document.username).map_err(|e| {
            AuthorError::StoreError(format!("Corrupt author document {}: {}", document.id, e))
        })?;

        Ok(Author {
            id,
            first_name: document.firstname,
            last_name: document.lastname,
            username,
            password_hash: document.password,
        })
    }
}

/// Fields to upsert into an author body, one entry per provided change.
pub fn author_patch(changes: &AuthorChanges) -> Map<String, Value> {
    let mut patch = Map::new();
    if let Some(first_name) = &changes.first_name {
        patch.insert("firstname".to_string(), Value::String(first_name.clone()));
    }
    if let Some(last_name) = &changes.last_name {
        patch.insert("lastname".to_string(), Value::String(last_name.clone()));
    }
    if let Some(username) = &changes.username {
        patch.insert(
            "username".to_string(),
            Value::String(username.as_str().to_string()),
        );
    }
    if let Some(password_hash) = &changes.password_hash {
        patch.insert("password".to_string(), Value::String(password_hash.clone()));
    }
    patch
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Article> for ArticleDocument {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.to_string(),
            author: article.author_id.to_string(),
            title: article.title.clone(),
            content: article.content.clone(),
            kind: Article::KIND.to_string(),
        }
    }
}

impl TryFrom<ArticleDocument> for Article {
    type Error = ArticleError;

    fn try_from(document: ArticleDocument) -> Result<Self, Self::Error> {
        let corrupt = |e: String| {
            ArticleError::StoreError(format!("Corrupt article document {}: {}", document.id, e))
        };
        let id = ArticleId::from_string(&document.id).map_err(|e| corrupt(e.to_string()))?;
        let author_id = AuthorId::from_string(&document.author).map_err(|e| corrupt(e.to_string()))?;

        Ok(Article {
            id,
            author_id,
            title: document.title,
            content: document.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_author_document_shape() {
        let author = Author {
            id: AuthorId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: Username::new("ada".to_string()).unwrap(),
            password_hash: "$argon2id$hash".to_string(),
        };

        let body = serde_json::to_value(AuthorDocument::from(&author)).unwrap();

        assert_eq!(
            body,
            json!({
                "id": author.id.to_string(),
                "firstname": "Ada",
                "lastname": "Lovelace",
                "username": "ada",
                "password": "$argon2id$hash",
                "type": "author",
            })
        );
    }

    #[test]
    fn test_corrupt_author_document() {
        let document = AuthorDocument {
            id: "not-a-uuid".to_string(),
            firstname: String::new(),
            lastname: String::new(),
            username: "ada".to_string(),
            password: String::new(),
            kind: "author".to_string(),
        };

        assert!(matches!(
            Author::try_from(document),
            Err(AuthorError::StoreError(_))
        ));
    }

    #[test]
    fn test_author_patch_contains_only_provided_fields() {
        let changes = AuthorChanges {
            last_name: Some("Byron".to_string()),
            password_hash: Some("$argon2id$new".to_string()),
            ..AuthorChanges::default()
        };

        assert_eq!(
            Value::Object(author_patch(&changes)),
            json!({"lastname": "Byron", "password": "$argon2id$new"})
        );
    }
}
