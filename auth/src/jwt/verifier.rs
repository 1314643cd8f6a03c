use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::TokenError;

/// Validates access tokens and recovers their claims.
///
/// Checks, in order: the header algorithm is HS256 and the signature matches
/// the key, `exp` lies strictly in the future, and `iss` is the expected
/// issuer. Holds no mutable state, so one instance can be shared freely.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    issuer: String,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier for tokens signed with `secret` by `issuer`.
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        // Only HS256 is accepted; expiry and issuer are checked by hand below
        // so the boundary is exact (no leeway).
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            validation,
        }
    }

    /// Verify `token` against the current time.
    ///
    /// # Errors
    /// * `Rejected` - Signature, algorithm, expiry or issuer check failed
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Rejected)?
            .claims;

        if claims.is_expired(now) {
            return Err(TokenError::Rejected);
        }

        if claims.iss != self.issuer {
            return Err(TokenError::Rejected);
        }

        Ok(claims)
    }
}
