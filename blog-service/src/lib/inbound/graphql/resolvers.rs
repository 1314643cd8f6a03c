use serde::Serialize;
use serde_json::Value;

use super::resolver::ResolverError;

pub mod articles;
pub mod authors;

pub use articles::ArticleResolver;
pub use articles::ArticlesResolver;
pub use articles::CreateArticleResolver;
pub use authors::AuthorResolver;
pub use authors::AuthorsResolver;
pub use authors::DeleteAuthorResolver;
pub use authors::UpdateAuthorResolver;

fn to_value<T: Serialize>(data: T) -> Result<Value, ResolverError> {
    serde_json::to_value(data).map_err(|e| ResolverError::Internal(e.to_string()))
}
