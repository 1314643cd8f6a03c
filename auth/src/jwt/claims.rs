use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
///
/// Deserialized straight from the verified payload; a value of this type is
/// only trustworthy once `TokenVerifier` has accepted the token it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (author identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl TokenClaims {
    /// Build claims for `subject` valid for `lifetime` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Identifier of the authenticated author
    /// * `issuer` - Fixed issuer identity of this service
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - How long the token stays valid
    pub fn new(
        subject: impl ToString,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            exp: (issued_at + lifetime).timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// A token is usable only while `exp` lies strictly after `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_claims() {
        let issued_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let claims = TokenClaims::new("author-1", "blog-service", issued_at, Duration::hours(1));

        assert_eq!(claims.subject(), "author-1");
        assert_eq!(claims.iss, "blog-service");
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let issued_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let claims = TokenClaims::new("author-1", "blog-service", issued_at, Duration::seconds(10));

        assert!(!claims.is_expired(issued_at + Duration::seconds(9)));
        assert!(claims.is_expired(issued_at + Duration::seconds(10))); // Exactly at expiration
        assert!(claims.is_expired(issued_at + Duration::seconds(11)));
    }
}
