//! Login Use Case
//!
//! Verifies email + password and opens a new session.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::support::{open_session, record_activity};
use crate::domain::entity::{ActivityAction, NewActivity, Session, UserProfile};
use crate::domain::repository::{ActivityLogRepository, SessionRepository, UserRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
    pub client: ClientInfo,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: UserProfile,
    pub session: Session,
    pub remember_me: bool,
}

pub struct LoginUseCase<U, S, L>
where
    U: UserRepository,
    S: SessionRepository,
    L: ActivityLogRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    activity_repo: Arc<L>,
    config: Arc<AuthConfig>,
}

impl<U, S, L> LoginUseCase<U, S, L>
where
    U: UserRepository,
    S: SessionRepository,
    L: ActivityLogRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        activity_repo: Arc<L>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            activity_repo,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".into(),
            ));
        }

        // A malformed address cannot belong to any account
        let email = Email::new(input.email).map_err(|_| AuthError::UserNotFound)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password = ClearTextPassword::new(input.password)?;
        if !user.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = open_session(self.session_repo.as_ref(), user.id, &self.config).await?;

        record_activity(
            self.activity_repo.as_ref(),
            NewActivity::new(
                user.id,
                ActivityAction::Login,
                format!("User logged in from {}", input.client.user_agent_or_unknown()),
                input.client.ip_string(),
            ),
        )
        .await;

        tracing::info!(
            user_id = %user.id,
            remember_me = input.remember_me,
            "User logged in"
        );

        Ok(LoginOutput {
            user: user.profile(),
            session,
            remember_me: input.remember_me,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::UserRole;
    use crate::infra::memory::MemoryAuthRepository;
    use chrono::Utc;

    fn use_case(
        repo: &MemoryAuthRepository,
    ) -> LoginUseCase<MemoryAuthRepository, MemoryAuthRepository, MemoryAuthRepository> {
        let repo = Arc::new(repo.clone());
        LoginUseCase::new(
            repo.clone(),
            repo.clone(),
            repo,
            Arc::new(AuthConfig::development()),
        )
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.into(),
            password: password.into(),
            remember_me: false,
            client: ClientInfo::default(),
        }
    }

    #[tokio::test]
    async fn test_login_success_issues_distinct_tokens() {
        let repo = MemoryAuthRepository::new();
        let ana = repo
            .seed_user("Ana", "ana@x.com", "secret1", UserRole::User)
            .await
            .unwrap();

        let first = use_case(&repo).execute(login("ana@x.com", "secret1")).await.unwrap();
        let second = use_case(&repo).execute(login("ana@x.com", "secret1")).await.unwrap();

        assert_eq!(first.user.id, ana.id);
        assert_ne!(first.session.token, second.session.token);
        assert_eq!(repo.session_count().await, 2);

        let resolved = repo
            .find_user_by_token(&second.session.token, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, ana.id);

        let log = repo.activity().await;
        assert_eq!(log[0].action, "login");
        assert_eq!(log[0].details.as_deref(), Some("User logged in from unknown device"));
    }

    #[tokio::test]
    async fn test_login_is_case_insensitive_on_email() {
        let repo = MemoryAuthRepository::new();
        repo.seed_user("Ana", "ana@x.com", "secret1", UserRole::User)
            .await
            .unwrap();

        assert!(use_case(&repo).execute(login("ANA@x.com", "secret1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_failures() {
        let repo = MemoryAuthRepository::new();
        repo.seed_user("Ana", "ana@x.com", "secret1", UserRole::User)
            .await
            .unwrap();

        let wrong = use_case(&repo).execute(login("ana@x.com", "nope")).await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        let unknown = use_case(&repo).execute(login("bob@x.com", "secret1")).await;
        assert!(matches!(unknown, Err(AuthError::UserNotFound)));

        let empty = use_case(&repo).execute(login("", "")).await;
        assert!(matches!(empty, Err(AuthError::Validation(_))));

        assert_eq!(repo.session_count().await, 0);
    }
}
