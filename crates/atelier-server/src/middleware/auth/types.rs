//! Authentication types.

use crate::models::User;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject, valid for `ttl` from now.
    pub fn new(subject: Uuid, ttl: chrono::Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.num_seconds(),
        }
    }

    /// Subject as a UUID, if well-formed.
    pub fn subject(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Whether the expiry has already passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// The resolved user bound to a request after the gate has run.
///
/// Handlers read this through the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_trip_subject() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, chrono::Duration::days(7));
        assert_eq!(claims.subject(), Some(id));
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn garbage_subject_is_none() {
        let claims = Claims {
            sub: "not-a-uuid".into(),
            iat: 0,
            exp: i64::MAX,
        };
        assert_eq!(claims.subject(), None);
    }
}
