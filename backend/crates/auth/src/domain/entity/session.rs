//! Session Entity
//!
//! `issued -> valid (now < expires_at) -> expired (row remains, lookups ignore
//! it) -> revoked (row deleted by logout)`.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{SessionId, UserId};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    #[inline]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl NewSession {
    /// Fresh random token valid for `ttl` from `now`
    pub fn issue(user_id: UserId, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token: platform::crypto::random_token(),
            expires_at: now + ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_expiry_and_token() {
        let now = Utc::now();
        let new = NewSession::issue(UserId::new(1), Duration::days(7), now);
        assert_eq!(new.expires_at - now, Duration::days(7));
        assert_eq!(new.token.len(), 64);
    }

    #[test]
    fn test_validity_is_strictly_before_expiry() {
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(1),
            user_id: UserId::new(1),
            token: "t".into(),
            expires_at: now,
            created_at: now - Duration::days(7),
        };
        assert!(!session.is_valid_at(now));
        assert!(session.is_valid_at(now - Duration::seconds(1)));
    }
}
