use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::AuthSecret;
use crate::error::{AppError, Result};
use crate::models::session::{Identity, SessionClaims};

/// How long a session token stays valid, in seconds (7 days).
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// Signs and verifies HS256 session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec bound to `secret`.
    pub fn new(secret: &AuthSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signs a token for `identity` that expires seven days from now.
    pub fn sign(&self, identity: &Identity) -> Result<String> {
        self.issue(identity, Utc::now())
    }

    /// Signs a token for `identity` as if issued at `issued_at`.
    ///
    /// # Arguments
    ///
    /// * `identity` - The identity fields to embed.
    /// * `issued_at` - The issue time; expiry is this plus [`SESSION_TTL_SECS`].
    ///
    /// # Returns
    ///
    /// A `Result` containing the compact token string.
    pub fn issue(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<String> {
        let iat = issued_at.timestamp();
        let claims = SessionClaims {
            user_id: identity.user_id,
            email: identity.email.clone(),
            name: identity.name.clone(),
            iat,
            exp: iat + SESSION_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Verifies the signature and expiry of `token`.
    ///
    /// Returns `None` for a missing, malformed, forged, or expired token.
    pub fn verify(&self, token: Option<&str>) -> Option<SessionClaims> {
        let token = token.filter(|t| !t.is_empty())?;

        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            // jsonwebtoken still accepts `exp == now`; the claim is only valid before it.
            Ok(data) if data.claims.exp <= Utc::now().timestamp() => {
                tracing::debug!("Session token rejected: expired");
                None
            }
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Session token rejected: {:?}", e.kind());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&AuthSecret::new(secret))
    }

    fn alice() -> Identity {
        Identity {
            user_id: 42,
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
        }
    }

    #[test]
    fn signed_token_round_trips() {
        let codec = codec("test-secret");
        let token = codec.sign(&alice()).unwrap();

        let claims = codec.verify(Some(&token)).unwrap();
        assert_eq!(claims.identity(), alice());
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECS);
    }

    #[test]
    fn nameless_identity_round_trips() {
        let codec = codec("test-secret");
        let identity = Identity { name: None, ..alice() };
        let token = codec.sign(&identity).unwrap();
        assert_eq!(codec.verify(Some(&token)).unwrap().identity(), identity);
    }

    #[test]
    fn expiry_is_seven_days_after_issue() {
        let codec = codec("test-secret");
        let issued_at = Utc::now() - Duration::hours(1);
        let token = codec.issue(&alice(), issued_at).unwrap();

        let claims = codec.verify(Some(&token)).unwrap();
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp, (issued_at + Duration::days(7)).timestamp());
    }

    #[test]
    fn missing_and_empty_tokens_have_no_claim() {
        let codec = codec("test-secret");
        assert_eq!(codec.verify(None), None);
        assert_eq!(codec.verify(Some("")), None);
    }

    #[test]
    fn garbage_tokens_have_no_claim() {
        let codec = codec("test-secret");
        for token in ["garbage", "a.b.c", "eyJhbGciOiJIUzI1NiJ9..", "...."] {
            assert_eq!(codec.verify(Some(token)), None, "{token:?}");
        }
    }

    #[test]
    fn token_from_another_secret_has_no_claim() {
        let token = codec("secret-one").sign(&alice()).unwrap();
        assert_eq!(codec("secret-two").verify(Some(&token)), None);
    }

    #[test]
    fn tampered_payload_has_no_claim() {
        let codec = codec("test-secret");
        let token = codec.sign(&alice()).unwrap();
        let other = codec
            .sign(&Identity { user_id: 1, ..alice() })
            .unwrap();

        // Splice the payload of one token onto the signature of another.
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert_eq!(codec.verify(Some(&forged)), None);
    }

    #[test]
    fn expired_token_has_no_claim() {
        let codec = codec("test-secret");
        let token = codec
            .issue(&alice(), Utc::now() - Duration::days(8))
            .unwrap();
        assert_eq!(codec.verify(Some(&token)), None);
    }

    #[test]
    fn token_at_its_expiry_second_has_no_claim() {
        let codec = codec("test-secret");
        let issued_at = Utc::now() - Duration::seconds(SESSION_TTL_SECS);
        let token = codec.issue(&alice(), issued_at).unwrap();
        assert_eq!(codec.verify(Some(&token)), None);
    }

    #[test]
    fn token_just_inside_window_is_accepted() {
        let codec = codec("test-secret");
        let issued_at = Utc::now() - Duration::days(7) + Duration::minutes(5);
        let token = codec.issue(&alice(), issued_at).unwrap();
        assert!(codec.verify(Some(&token)).is_some());
    }
}
