use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::TokenClaims;
use super::errors::TokenError;

/// Mints signed, time-bounded access tokens.
///
/// Tokens are HS256 JWTs whose claims are `{sub, iss, iat, exp}`.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Lifetime applied when none is configured.
    pub const DEFAULT_LIFETIME_MINUTES: i64 = 60;

    /// Create an issuer signing with `secret` under the `issuer` identity.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load it from configuration, never from source code
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            issuer: issuer.into(),
            lifetime: Duration::minutes(Self::DEFAULT_LIFETIME_MINUTES),
        }
    }

    /// Override the token lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject`, valid from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: impl ToString) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject: impl ToString,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::new(subject, &self.issuer, issued_at, self.lifetime);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }
}
