use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::to_value;
use crate::author::models::AuthorId;
use crate::author::models::UpdateAuthorCommand;
use crate::author::ports::AuthorServicePort;
use crate::inbound::graphql::context::RequestContext;
use crate::inbound::graphql::gate::Capability;
use crate::inbound::graphql::gate::ResolverGate;
use crate::inbound::graphql::resolver::Arguments;
use crate::inbound::graphql::resolver::Resolver;
use crate::inbound::graphql::resolver::ResolverError;
use crate::inbound::messages::AuthorData;

fn parse_author_id(id: &str) -> Result<AuthorId, ResolverError> {
    AuthorId::from_string(id).map_err(|e| ResolverError::InvalidArguments(e.to_string()))
}

/// `authors`: every registered author.
pub struct AuthorsResolver {
    author_service: Arc<dyn AuthorServicePort>,
}

impl AuthorsResolver {
    pub fn new(author_service: Arc<dyn AuthorServicePort>) -> Self {
        Self { author_service }
    }
}

#[async_trait]
impl Resolver for AuthorsResolver {
    async fn resolve(
        &self,
        _context: &RequestContext,
        _arguments: Arguments,
    ) -> Result<Value, ResolverError> {
        let authors = self.author_service.list_authors().await?;
        to_value(authors.iter().map(AuthorData::from).collect::<Vec<_>>())
    }
}

/// `author(id)`
pub struct AuthorResolver {
    author_service: Arc<dyn AuthorServicePort>,
}

impl AuthorResolver {
    pub fn new(author_service: Arc<dyn AuthorServicePort>) -> Self {
        Self { author_service }
    }
}

#[async_trait]
impl Resolver for AuthorResolver {
    async fn resolve(
        &self,
        _context: &RequestContext,
        arguments: Arguments,
    ) -> Result<Value, ResolverError> {
        let id = parse_author_id(arguments.required_str("id")?)?;
        let author = self.author_service.get_author(&id).await?;
        to_value(AuthorData::from(&author))
    }
}

/// `deleteAuthor(id)`: only the author themself may delete their account.
pub struct DeleteAuthorResolver {
    author_service: Arc<dyn AuthorServicePort>,
    gate: ResolverGate,
}

impl DeleteAuthorResolver {
    pub fn new(author_service: Arc<dyn AuthorServicePort>, gate: ResolverGate) -> Self {
        Self {
            author_service,
            gate,
        }
    }
}

#[async_trait]
impl Resolver for DeleteAuthorResolver {
    async fn resolve(
        &self,
        context: &RequestContext,
        arguments: Arguments,
    ) -> Result<Value, ResolverError> {
        let target = match arguments.required_str("id").and_then(parse_author_id) {
            Ok(target) => target,
            Err(e) => {
                self.gate.authenticate(context)?;
                return Err(e);
            }
        };
        self.gate
            .authorize(context, Capability::ManageAuthor(target))?;

        self.author_service.delete_author(&target).await?;

        Ok(Value::String(target.to_string()))
    }
}

/// `author` argument of `updateAuthor`.
#[derive(Debug, Deserialize)]
struct AuthorInput {
    id: String,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// `updateAuthor(author)`: field-wise update of the caller's own account.
pub struct UpdateAuthorResolver {
    author_service: Arc<dyn AuthorServicePort>,
    gate: ResolverGate,
}

impl UpdateAuthorResolver {
    pub fn new(author_service: Arc<dyn AuthorServicePort>, gate: ResolverGate) -> Self {
        Self {
            author_service,
            gate,
        }
    }
}

#[async_trait]
impl Resolver for UpdateAuthorResolver {
    async fn resolve(
        &self,
        context: &RequestContext,
        arguments: Arguments,
    ) -> Result<Value, ResolverError> {
        let parsed = arguments
            .object::<AuthorInput>("author")
            .and_then(|input| Ok((parse_author_id(&input.id)?, input)));
        let (target, input) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                self.gate.authenticate(context)?;
                return Err(e);
            }
        };
        self.gate
            .authorize(context, Capability::ManageAuthor(target))?;

        let command = UpdateAuthorCommand::new(
            input.firstname,
            input.lastname,
            input.username,
            input.password,
        )?;

        let author = self.author_service.update_author(&target, command).await?;
        to_value(AuthorData::from(&author))
    }
}
