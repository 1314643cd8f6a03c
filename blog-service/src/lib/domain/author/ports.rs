use async_trait::async_trait;

use crate::author::errors::AuthorError;
use crate::author::models::Author;
use crate::author::models::AuthorChanges;
use crate::author::models::AuthorId;
use crate::author::models::RegisterAuthorCommand;
use crate::author::models::UpdateAuthorCommand;

/// Port for author (credential) domain service operations.
#[async_trait]
pub trait AuthorServicePort: Send + Sync + 'static {
    /// Register a new author.
    ///
    /// # Arguments
    /// * `command` - Validated command containing names, username and password
    ///
    /// # Returns
    /// Created author entity with a freshly generated ID
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - The store rejected a duplicate username
    /// * `Password` - Hashing failed
    /// * `StoreError` - Store operation failed
    async fn register(&self, command: RegisterAuthorCommand) -> Result<Author, AuthorError>;

    /// Check credentials and issue an access token.
    ///
    /// # Returns
    /// Signed token whose subject is the author's ID
    ///
    /// # Errors
    /// * `MissingField` - Username or password is empty
    /// * `InvalidCredentials` - Unknown username, ambiguous username or wrong password
    /// * `StoreError` - Store operation failed
    async fn login(&self, username: &str, password: &str) -> Result<String, AuthorError>;

    /// # Errors
    /// * `NotFound` - Author does not exist
    /// * `StoreError` - Store operation failed
    async fn get_author(&self, id: &AuthorId) -> Result<Author, AuthorError>;

    /// # Errors
    /// * `StoreError` - Store operation failed
    async fn list_authors(&self) -> Result<Vec<Author>, AuthorError>;

    /// Apply the provided fields of `command` to an existing author.
    ///
    /// # Errors
    /// * `NotFound` - Author does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `StoreError` - Store operation failed
    async fn update_author(
        &self,
        id: &AuthorId,
        command: UpdateAuthorCommand,
    ) -> Result<Author, AuthorError>;

    /// # Errors
    /// * `NotFound` - Author does not exist
    /// * `StoreError` - Store operation failed
    async fn delete_author(&self, id: &AuthorId) -> Result<(), AuthorError>;
}

/// Persistence operations for the author aggregate.
#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    /// Persist a new author document.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `StoreError` - Store operation failed
    async fn create(&self, author: Author) -> Result<Author, AuthorError>;

    /// # Returns
    /// Optional author entity (None if not found)
    async fn find_by_id(&self, id: &AuthorId) -> Result<Option<Author>, AuthorError>;

    /// Retrieve every author document whose username equals `username`.
    ///
    /// # Returns
    /// All matches; callers decide what zero or several matches mean
    async fn find_by_username(&self, username: &str) -> Result<Vec<Author>, AuthorError>;

    async fn list_all(&self) -> Result<Vec<Author>, AuthorError>;

    /// Upsert each provided field into the stored document.
    ///
    /// # Returns
    /// The author as stored after the change
    ///
    /// # Errors
    /// * `NotFound` - Author does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `StoreError` - Store operation failed
    async fn update(&self, id: &AuthorId, changes: AuthorChanges) -> Result<Author, AuthorError>;

    /// # Errors
    /// * `NotFound` - Author does not exist
    /// * `StoreError` - Store operation failed
    async fn delete(&self, id: &AuthorId) -> Result<(), AuthorError>;
}
