use std::sync::Arc;

use auth::Authenticator;

use super::context::RequestContext;
use super::resolver::ResolverError;
use crate::author::models::AuthorId;

/// Privileged action a resolver is about to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Publish an article as the caller.
    CreateArticle,

    /// Change or remove the given author; only the author themself may do so.
    ManageAuthor(AuthorId),
}

/// Identity check run by every protected resolver before it touches the store.
#[derive(Clone)]
pub struct ResolverGate {
    authenticator: Arc<Authenticator>,
}

impl ResolverGate {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Resolve the request token into the calling author's ID.
    ///
    /// # Errors
    /// * `Unauthorized` - Token missing, invalid or expired, or subject malformed
    pub fn authenticate(&self, context: &RequestContext) -> Result<AuthorId, ResolverError> {
        let token = context.token().ok_or_else(|| {
            tracing::debug!("Protected operation without token");
            ResolverError::Unauthorized
        })?;

        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Token rejected");
            ResolverError::Unauthorized
        })?;

        AuthorId::from_string(claims.subject()).map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not an author ID");
            ResolverError::Unauthorized
        })
    }

    /// Authenticate the caller and check they may perform `capability`.
    ///
    /// # Arguments
    /// * `context` - Request context carrying the optional bearer token
    /// * `capability` - Action the caller wants to perform
    ///
    /// # Returns
    /// Verified subject of the token
    ///
    /// # Errors
    /// * `Unauthorized` - Authentication failed, or the subject may not
    ///   perform `capability`
    pub fn authorize(
        &self,
        context: &RequestContext,
        capability: Capability,
    ) -> Result<AuthorId, ResolverError> {
        let subject = self.authenticate(context)?;

        match capability {
            Capability::CreateArticle => Ok(subject),
            Capability::ManageAuthor(target) if target == subject => Ok(subject),
            Capability::ManageAuthor(target) => {
                tracing::warn!(
                    author_id = %subject,
                    target_id = %target,
                    "Author may only manage their own account"
                );
                Err(ResolverError::Unauthorized)
            }
        }
    }
}
