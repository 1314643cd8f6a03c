//! Authentication core for the blog service
//!
//! - Password hashing (Argon2id, fixed work factor)
//! - Access token issuance and verification (HS256, typed claims)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenIssuer, TokenVerifier};
//!
//! let secret = b"secret_key_at_least_32_bytes_long!";
//! let issuer = TokenIssuer::new(secret, "blog-service");
//! let verifier = TokenVerifier::new(secret, "blog-service");
//!
//! let token = issuer.issue("author123").unwrap();
//! let claims = verifier.verify(&token).unwrap();
//! assert_eq!(claims.subject(), "author123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", "blog-service");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "author123").unwrap();
//!
//! // Protected call: validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.subject(), "author123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::TokenClaims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use password::PasswordError;
pub use password::PasswordHasher;
