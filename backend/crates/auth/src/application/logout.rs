//! Logout Use Case
//!
//! Deletes the session row. Idempotent: an unknown or missing token is a
//! successful no-op.

use std::sync::Arc;

use chrono::Utc;
use platform::client::ClientInfo;

use crate::application::support::record_activity;
use crate::domain::entity::{ActivityAction, NewActivity};
use crate::domain::repository::{ActivityLogRepository, SessionRepository};
use crate::error::AuthResult;

#[derive(Debug)]
pub struct LogoutOutput {
    pub sessions_deleted: u64,
}

pub struct LogoutUseCase<S, L>
where
    S: SessionRepository,
    L: ActivityLogRepository,
{
    session_repo: Arc<S>,
    activity_repo: Arc<L>,
}

impl<S, L> LogoutUseCase<S, L>
where
    S: SessionRepository,
    L: ActivityLogRepository,
{
    pub fn new(session_repo: Arc<S>, activity_repo: Arc<L>) -> Self {
        Self {
            session_repo,
            activity_repo,
        }
    }

    pub async fn execute(&self, token: Option<&str>, client: &ClientInfo) -> AuthResult<LogoutOutput> {
        let Some(token) = token else {
            return Ok(LogoutOutput { sessions_deleted: 0 });
        };

        // Owner is looked up for the audit entry only
        let owner = self.session_repo.find_user_by_token(token, Utc::now()).await?;
        let sessions_deleted = self.session_repo.delete_by_token(token).await?;

        if let Some(user) = owner {
            record_activity(
                self.activity_repo.as_ref(),
                NewActivity::new(user.id, ActivityAction::Logout, "User logged out", client.ip_string()),
            )
            .await;
            tracing::info!(user_id = %user.id, "User logged out");
        }

        Ok(LogoutOutput { sessions_deleted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::NewSession;
    use crate::domain::value_object::UserRole;
    use crate::infra::memory::MemoryAuthRepository;
    use chrono::Duration;

    fn use_case(repo: &MemoryAuthRepository) -> LogoutUseCase<MemoryAuthRepository, MemoryAuthRepository> {
        let repo = Arc::new(repo.clone());
        LogoutUseCase::new(repo.clone(), repo)
    }

    #[tokio::test]
    async fn test_logout_deletes_exactly_one_session() {
        let repo = MemoryAuthRepository::new();
        let user = repo
            .seed_user("Ana", "ana@x.com", "secret1", UserRole::User)
            .await
            .unwrap();
        let now = Utc::now();
        let kept = repo
            .create_session(&NewSession::issue(user.id, Duration::days(7), now))
            .await
            .unwrap();
        let dropped = repo
            .create_session(&NewSession::issue(user.id, Duration::days(7), now))
            .await
            .unwrap();

        let out = use_case(&repo)
            .execute(Some(&dropped.token), &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(out.sessions_deleted, 1);
        assert!(repo.find_user_by_token(&dropped.token, now).await.unwrap().is_none());
        assert!(repo.find_user_by_token(&kept.token, now).await.unwrap().is_some());
        assert_eq!(repo.activity().await[0].action, "logout");
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let repo = MemoryAuthRepository::new();
        let uc = use_case(&repo);

        let none = uc.execute(None, &ClientInfo::default()).await.unwrap();
        let unknown = uc.execute(Some("feedface"), &ClientInfo::default()).await.unwrap();

        assert_eq!(none.sessions_deleted, 0);
        assert_eq!(unknown.sessions_deleted, 0);
        assert!(repo.activity().await.is_empty());
    }
}
