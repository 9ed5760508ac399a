//! Steps shared by the session-issuing use cases

use chrono::Utc;
use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::domain::entity::{NewActivity, NewSession, Session};
use crate::domain::repository::{ActivityLogRepository, SessionRepository};
use crate::error::AuthResult;

/// Insert a fresh session row for `user_id`
pub(crate) async fn open_session<S>(repo: &S, user_id: UserId, config: &AuthConfig) -> AuthResult<Session>
where
    S: SessionRepository,
{
    let new = NewSession::issue(user_id, config.session_ttl_chrono(), Utc::now());
    repo.create_session(&new).await
}

/// Append to the audit trail. A failed append never fails the request
/// that caused it.
pub(crate) async fn record_activity<L>(repo: &L, entry: NewActivity)
where
    L: ActivityLogRepository,
{
    if let Err(e) = repo.append(&entry).await {
        tracing::warn!(
            error = %e,
            action = %entry.action,
            "Failed to record user activity"
        );
    }
}
