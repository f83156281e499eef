//! Stateless session tokens.
//!
//! A session is an HS256 JWT carrying the user id, email, issue time and
//! expiry. Nothing is stored server side: a token is valid exactly while its
//! signature verifies and its expiry lies in the future. Logging out is the
//! client discarding the token.
//!
//! The registered `exp` claim only holds whole seconds, so the sub-second part
//! of the expiry travels in `exp_nsec` and expiry is decided at nanosecond
//! precision.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session lifetime of the reference policy.
pub const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 24;

/// Claim set embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub email: String,
    pub exp: i64,
    /// Sub-second part of the expiry.
    #[serde(default)]
    pub exp_nsec: u32,
    pub iat: i64,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: i64,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Forged, malformed, or otherwise untrustworthy token.
    #[error("invalid session token")]
    Invalid,
    /// Authentic token whose expiry has passed.
    #[error("session token expired")]
    Expired,
    #[error("failed to sign session token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with a fixed signing secret.
#[derive(Clone)]
pub struct SessionAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl SessionAuthority {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked explicitly so it can be told apart from forgery.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a token for `user_id` valid from now for the configured lifetime.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, SessionError> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let expires_at = now + self.lifetime;
        let claims = SessionClaims {
            user_id,
            email: email.to_string(),
            exp: expires_at.timestamp(),
            exp_nsec: expires_at.timestamp_subsec_nanos(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SessionError::Signing)
    }

    /// Verifies `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<SessionIdentity, SessionError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature and structure first, then identity, then expiry.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionIdentity, SessionError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                SessionError::Invalid
            })?
            .claims;

        if claims.user_id <= 0 {
            return Err(SessionError::Invalid);
        }

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, claims.exp_nsec)
            .ok_or(SessionError::Invalid)?;
        if now >= expires_at {
            return Err(SessionError::Expired);
        }

        Ok(SessionIdentity {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lifetime() -> Duration {
        Duration::hours(DEFAULT_SESSION_LIFETIME_HOURS)
    }

    fn authority(secret: &str) -> SessionAuthority {
        SessionAuthority::new(secret.as_bytes(), lifetime())
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_round_trip_identity() {
        let sessions = authority("test-secret");
        let token = sessions.issue_at(7, "a@x.com", issued_at()).unwrap();

        let identity = sessions.verify_at(&token, issued_at()).unwrap();

        assert_eq!(identity.user_id, 7);
        assert_eq!(identity.email, "a@x.com");
    }

    #[test]
    fn test_valid_until_just_before_expiry() {
        let sessions = authority("test-secret");
        let token = sessions.issue_at(7, "a@x.com", issued_at()).unwrap();

        let last_valid = issued_at() + lifetime() - Duration::seconds(1);
        assert!(sessions.verify_at(&token, last_valid).is_ok());
    }

    #[test]
    fn test_expired_at_and_after_expiry() {
        let sessions = authority("test-secret");
        let token = sessions.issue_at(7, "a@x.com", issued_at()).unwrap();

        let expiry = issued_at() + lifetime();
        assert!(matches!(
            sessions.verify_at(&token, expiry),
            Err(SessionError::Expired)
        ));
        assert!(matches!(
            sessions.verify_at(&token, expiry + Duration::days(30)),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn test_other_secret_is_invalid_even_when_expired() {
        let forger = authority("other-secret");
        let sessions = authority("test-secret");
        let token = forger.issue_at(7, "a@x.com", issued_at()).unwrap();

        assert!(matches!(
            sessions.verify_at(&token, issued_at()),
            Err(SessionError::Invalid)
        ));
        assert!(matches!(
            sessions.verify_at(&token, issued_at() + Duration::days(2)),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_zero_user_id_is_invalid() {
        let sessions = authority("test-secret");
        let token = sessions.issue_at(0, "a@x.com", issued_at()).unwrap();

        assert!(matches!(
            sessions.verify_at(&token, issued_at()),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let sessions = authority("test-secret");

        for token in ["", "abc", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
            assert!(matches!(
                sessions.verify_at(token, issued_at()),
                Err(SessionError::Invalid)
            ));
        }
    }

    #[test]
    fn test_tokens_carry_issue_time() {
        let sessions = authority("test-secret");
        let first = sessions.issue_at(7, "a@x.com", issued_at()).unwrap();
        let later = sessions
            .issue_at(7, "a@x.com", issued_at() + Duration::seconds(1))
            .unwrap();

        assert_ne!(first, later);
    }

    #[test]
    fn test_fresh_token_verifies_now() {
        let sessions = authority("test-secret");
        let token = sessions.issue(11, "b@x.com").unwrap();

        assert_eq!(sessions.verify(&token).unwrap().user_id, 11);
    }

    #[test]
    fn test_fractional_issue_time_expires_exactly() {
        let sessions = authority("test-secret");
        let issued = issued_at() + Duration::milliseconds(900);
        let token = sessions.issue_at(7, "a@x.com", issued).unwrap();
        let expiry = issued + lifetime();

        assert!(
            sessions
                .verify_at(&token, expiry - Duration::milliseconds(500))
                .is_ok()
        );
        assert!(matches!(
            sessions.verify_at(&token, expiry),
            Err(SessionError::Expired)
        ));
    }
}
