//! Serializable wire types shared by the HTTP and GraphQL adapters.
//!
//! Domain models never derive `Serialize`; these types decide exactly which
//! fields leave the service. The password hash is never among them.

use serde::Serialize;

use crate::article::models::Article;
use crate::author::models::Author;

/// Public view of an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorData {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Author> for AuthorData {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id.to_string(),
            firstname: author.first_name.clone(),
            lastname: author.last_name.clone(),
            username: author.username.as_str().to_string(),
            kind: Author::KIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleData {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Article> for ArticleData {
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
