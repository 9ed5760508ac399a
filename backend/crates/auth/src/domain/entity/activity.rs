//! Activity Log Entity
//!
//! Append-only audit trail. `user_id` becomes NULL when the user is deleted.

use chrono::{DateTime, Utc};
use derive_more::Display;
use kernel::id::{ActivityLogId, UserId};
use serde::Serialize;

/// Tags written to `user_activity_log.action`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ActivityAction {
    #[display("register")]
    Register,
    #[display("login")]
    Login,
    #[display("logout")]
    Logout,
    #[display("profile_update")]
    ProfileUpdate,
    #[display("user_create")]
    UserCreate,
    #[display("user_update")]
    UserUpdate,
    #[display("user_delete")]
    UserDelete,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<UserId>,
    pub action: ActivityAction,
    pub details: String,
    pub ip_address: Option<String>,
}

impl NewActivity {
    pub fn new(
        user_id: UserId,
        action: ActivityAction,
        details: impl Into<String>,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            action,
            details: details.into(),
            ip_address,
        }
    }
}

/// Stored entry. `action` stays a string so rows written by other tools
/// still read back.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogEntry {
    pub id: ActivityLogId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tags() {
        assert_eq!(ActivityAction::Register.to_string(), "register");
        assert_eq!(ActivityAction::Login.to_string(), "login");
        assert_eq!(ActivityAction::Logout.to_string(), "logout");
        assert_eq!(ActivityAction::ProfileUpdate.to_string(), "profile_update");
    }
}
