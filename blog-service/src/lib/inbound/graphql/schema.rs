use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::context::RequestContext;
use super::document;
use super::document::OperationKind;
use super::gate::ResolverGate;
use super::resolver::Arguments;
use super::resolver::Resolver;
use super::resolver::ResolverError;
use super::resolvers::ArticleResolver;
use super::resolvers::ArticlesResolver;
use super::resolvers::AuthorResolver;
use super::resolvers::AuthorsResolver;
use super::resolvers::CreateArticleResolver;
use super::resolvers::DeleteAuthorResolver;
use super::resolvers::UpdateAuthorResolver;
use crate::article::ports::ArticleServicePort;
use crate::author::ports::AuthorServicePort;

/// Body of a `/graphql` request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
    #[serde(default, rename = "operationName")]
    pub operation_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQLError {
    pub message: String,
}

/// `{"data": ...}` on success, `{"data": null, "errors": [...]}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLResponse {
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    fn data(key: &str, value: Value) -> Self {
        let mut data = Map::new();
        data.insert(key.to_string(), value);
        Self {
            data: Some(Value::Object(data)),
            errors: Vec::new(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![GraphQLError {
                message: message.into(),
            }],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

struct RootFieldEntry {
    kind: OperationKind,
    resolver: Arc<dyn Resolver>,
}

/// Root fields and the resolvers serving them.
///
/// Built once at startup; resolvers receive every dependency through their
/// constructors.
pub struct Schema {
    fields: HashMap<&'static str, RootFieldEntry>,
}

impl Schema {
    pub fn new(
        author_service: Arc<dyn AuthorServicePort>,
        article_service: Arc<dyn ArticleServicePort>,
        gate: ResolverGate,
    ) -> Self {
        Self::empty()
            .register(
                "authors",
                OperationKind::Query,
                AuthorsResolver::new(Arc::clone(&author_service)),
            )
            .register(
                "author",
                OperationKind::Query,
                AuthorResolver::new(Arc::clone(&author_service)),
            )
            .register(
                "articles",
                OperationKind::Query,
                ArticlesResolver::new(Arc::clone(&article_service)),
            )
            .register(
                "article",
                OperationKind::Query,
                ArticleResolver::new(Arc::clone(&article_service)),
            )
            .register(
                "deleteAuthor",
                OperationKind::Mutation,
                DeleteAuthorResolver::new(Arc::clone(&author_service), gate.clone()),
            )
            .register(
                "updateAuthor",
                OperationKind::Mutation,
                UpdateAuthorResolver::new(author_service, gate.clone()),
            )
            .register(
                "createArticle",
                OperationKind::Mutation,
                CreateArticleResolver::new(article_service, gate),
            )
    }

    fn empty() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    fn register(mut self, name: &'static str, kind: OperationKind, resolver: impl Resolver) -> Self {
        self.fields.insert(
            name,
            RootFieldEntry {
                kind,
                resolver: Arc::new(resolver),
            },
        );
        self
    }

    /// Parse `request.query`, bind its arguments and run the matching resolver.
    ///
    /// A request that names an `operationName` must match the document's
    /// operation name.
    ///
    /// Never fails; every error ends up in the response's `errors` list.
    pub async fn execute(&self, context: &RequestContext, request: GraphQLRequest) -> GraphQLResponse {
        let field = match document::parse(&request.query) {
            Ok(field) => field,
            Err(e) => {
                tracing::debug!(error = %e, "Unparsable query document");
                return GraphQLResponse::error(e.to_string());
            }
        };

        if let Some(requested) = &request.operation_name {
            if field.operation_name.as_deref() != Some(requested.as_str()) {
                return GraphQLResponse::error(format!("Unknown operation named \"{}\"", requested));
            }
        }

        let Some(entry) = self.fields.get(field.name.as_str()) else {
            return GraphQLResponse::error(format!("Unknown field: {}", field.name));
        };

        if entry.kind != field.kind {
            return GraphQLResponse::error(format!(
                "Field {} is not available on {} operations",
                field.name,
                field.kind.as_str()
            ));
        }

        let variables = request.variables.unwrap_or_default();
        let arguments = Arguments::new(field.arguments(&variables));

        match entry.resolver.resolve(context, arguments).await {
            Ok(value) => GraphQLResponse::data(field.response_key(), value),
            Err(e) => {
                match &e {
                    ResolverError::Internal(detail) => {
                        tracing::error!(field = %field.name, error = %detail, "Resolver failed")
                    }
                    _ => tracing::debug!(field = %field.name, error = %e, "Resolver rejected request"),
                }
                GraphQLResponse::error(e.to_string())
            }
        }
    }
}
