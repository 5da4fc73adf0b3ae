//! Token issuance and verification.

use super::types::Claims;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

/// Fixed validity window for issued tokens.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Verification failure. Collapsed to one external reason by the gate; the
/// split exists for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("expired token")]
    Expired,
}

/// Signs and verifies identity tokens. Pure function of the token and the
/// process-wide secret; consults no store.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenCodec {
    /// Build a codec around the signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: chrono::Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Issue a signed token binding `subject` to a 7-day validity window.
    pub fn issue(&self, subject: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims::new(subject, self.ttl);
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Check signature and expiry, returning the subject id.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        data.claims.subject().ok_or(TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_chars_long!!";

    #[test]
    fn verify_returns_the_issued_subject() {
        let codec = TokenCodec::new(SECRET);
        let subject = Uuid::new_v4();

        let token = codec.issue(subject).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), subject);
    }

    #[test]
    fn two_tokens_for_one_subject_are_distinct_and_both_verify() {
        let codec = TokenCodec::new(SECRET);
        let subject = Uuid::new_v4();

        let first = codec.issue(subject).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = codec.issue(subject).unwrap();

        assert_ne!(first, second);
        assert_eq!(codec.verify(&first).unwrap(), subject);
        assert_eq!(codec.verify(&second).unwrap(), subject);
    }

    #[test]
    fn expired_token_fails_as_expired() {
        let codec = TokenCodec::new(SECRET);
        let subject = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now - 8 * 24 * 3600,
            exp: now - 24 * 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn tampered_token_fails_as_malformed() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.issue(Uuid::new_v4()).unwrap();

        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert_eq!(codec.verify(&tampered).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn token_signed_with_another_secret_fails() {
        let codec = TokenCodec::new(SECRET);
        let other = TokenCodec::new("a_completely_different_secret!!!");
        let token = other.issue(Uuid::new_v4()).unwrap();

        assert_eq!(codec.verify(&token).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn non_uuid_subject_fails_as_malformed() {
        let codec = TokenCodec::new(SECRET);
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user-42".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec.verify(&token).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn garbage_fails_as_malformed() {
        let codec = TokenCodec::new(SECRET);
        assert_eq!(
            codec.verify("not.a.token").unwrap_err(),
            TokenError::Malformed
        );
    }
}
