use chrono::Duration;

use crate::jwt::TokenClaims;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenVerifier;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
///
/// Built once at startup from the signing secret and shared by every service
/// and resolver that needs it.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_verifier: TokenVerifier,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    /// * `issuer` - Issuer identity stamped into and required from every token
    pub fn new(secret: &[u8], issuer: &str) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(secret, issuer),
            token_verifier: TokenVerifier::new(secret, issuer),
        }
    }

    /// Override the lifetime of issued tokens.
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_issuer = self.token_issuer.with_lifetime(lifetime);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier to embed as the token subject
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_issuer.issue(subject)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Fail a login attempt that matched no stored credential.
    ///
    /// Burns a full hash verification first so this path costs the same as a
    /// wrong password.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_dummy(password);
        AuthenticationError::InvalidCredentials
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `Rejected` - Token failed signature, expiry or issuer checks
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.token_verifier.verify(token)
    }
}
