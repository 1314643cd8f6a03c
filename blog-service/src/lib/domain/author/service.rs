use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::author::errors::AuthorError;
use crate::author::models::Author;
use crate::author::models::AuthorChanges;
use crate::author::models::AuthorId;
use crate::author::models::RegisterAuthorCommand;
use crate::author::models::UpdateAuthorCommand;
use crate::author::ports::AuthorRepository;
use crate::author::ports::AuthorServicePort;

/// Domain service implementation for author registration, login and profile operations.
///
/// Concrete implementation of AuthorServicePort with dependency injection.
pub struct AuthorService<AR>
where
    AR: AuthorRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AuthorService<AR>
where
    AR: AuthorRepository,
{
    /// Create a new author service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Author persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<AR> AuthorServicePort for AuthorService<AR>
where
    AR: AuthorRepository,
{
    async fn register(&self, command: RegisterAuthorCommand) -> Result<Author, AuthorError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())?;

        let author = Author {
            id: AuthorId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            username: command.username,
            password_hash,
        };

        let created_author = self.repository.create(author).await?;

        tracing::info!(
            author_id = %created_author.id,
            username = %created_author.username,
            "Author registered"
        );

        Ok(created_author)
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, AuthorError> {
        if username.is_empty() {
            return Err(AuthorError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AuthorError::MissingField("password"));
        }

        let mut candidates = self.repository.find_by_username(username).await?;

        // Unknown and ambiguous usernames go through a decoy verification so
        // they cost the same as a wrong password.
        if candidates.len() != 1 {
            if candidates.len() > 1 {
                tracing::warn!(
                    username,
                    matches = candidates.len(),
                    "Login rejected: username matches several authors"
                );
            }
            self.authenticator.reject_unknown(password);
            return Err(AuthorError::InvalidCredentials);
        }

        let author = candidates.remove(0);

        match self
            .authenticator
            .authenticate(password, &author.password_hash, author.id)
        {
            Ok(result) => {
                tracing::info!(author_id = %author.id, "Author logged in");
                Ok(result.access_token)
            }
            Err(AuthenticationError::InvalidCredentials) => Err(AuthorError::InvalidCredentials),
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(
                    author_id = %author.id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                Err(AuthorError::InvalidCredentials)
            }
            Err(AuthenticationError::TokenError(e)) => Err(AuthorError::Token(e)),
        }
    }

    async fn get_author(&self, id: &AuthorId) -> Result<Author, AuthorError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AuthorError::NotFound(id.to_string()))
    }

    async fn list_authors(&self) -> Result<Vec<Author>, AuthorError> {
        self.repository.list_all().await
    }

    async fn update_author(
        &self,
        id: &AuthorId,
        command: UpdateAuthorCommand,
    ) -> Result<Author, AuthorError> {
        if command.is_empty() {
            return self.get_author(id).await;
        }

        let password_hash = command
            .password
            .map(|password| self.authenticator.hash_password(password.as_str()))
            .transpose()?;

        let changes = AuthorChanges {
            first_name: command.first_name,
            last_name: command.last_name,
            username: command.username,
            password_hash,
        };

        let updated_author = self.repository.update(id, changes).await?;

        tracing::info!(author_id = %updated_author.id, "Author updated");

        Ok(updated_author)
    }

    async fn delete_author(&self, id: &AuthorId) -> Result<(), AuthorError> {
        self.repository.delete(id).await?;

        tracing::info!(author_id = %id, "Author deleted");

        Ok(())
    }
}
