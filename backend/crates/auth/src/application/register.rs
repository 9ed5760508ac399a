//! Register Use Case
//!
//! Creates an account with role `user` and signs it straight in.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::support::{open_session, record_activity};
use crate::domain::entity::user::DEFAULT_PROFILE_IMAGE;
use crate::domain::entity::{ActivityAction, NewActivity, NewUser, Session, UserProfile};
use crate::domain::repository::{ActivityLogRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{Email, UserRole};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_terms: bool,
    pub client: ClientInfo,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user: UserProfile,
    pub session: Session,
}

pub struct RegisterUseCase<U, S, L>
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

impl<U, S, L> RegisterUseCase<U, S, L>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        if input.name.trim().is_empty() || input.email.trim().is_empty() || input.password.is_empty()
        {
            return Err(AuthError::Validation("All fields are required".into()));
        }
        if input.password != input.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".into()));
        }
        if !input.agree_terms {
            return Err(AuthError::Validation(
                "You must agree to the terms and conditions".into(),
            ));
        }

        let email = Email::new(input.email)?;
        let password_hash = ClearTextPassword::new(input.password)?.hash(self.config.password_scheme)?;

        let user_id = self
            .user_repo
            .create(&NewUser {
                name: input.name.trim().to_string(),
                email,
                password_hash,
                role: UserRole::User,
                profile_image: Some(DEFAULT_PROFILE_IMAGE.to_string()),
                bio: None,
            })
            .await?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("registered user vanished".into()))?;

        let session = open_session(self.session_repo.as_ref(), user.id, &self.config).await?;

        record_activity(
            self.activity_repo.as_ref(),
            NewActivity::new(
                user.id,
                ActivityAction::Register,
                format!(
                    "User registered and logged in from {}",
                    input.client.user_agent_or_unknown()
                ),
                input.client.ip_string(),
            ),
        )
        .await;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(RegisterOutput {
            user: user.profile(),
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryAuthRepository;
    use chrono::Utc;

    fn use_case(
        repo: &MemoryAuthRepository,
    ) -> RegisterUseCase<MemoryAuthRepository, MemoryAuthRepository, MemoryAuthRepository> {
        let repo = Arc::new(repo.clone());
        RegisterUseCase::new(
            repo.clone(),
            repo.clone(),
            repo,
            Arc::new(AuthConfig::development()),
        )
    }

    fn ana() -> RegisterInput {
        RegisterInput {
            name: "Ana".into(),
            email: "ana@x.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            agree_terms: true,
            client: ClientInfo {
                ip: Some("10.0.0.9".parse().unwrap()),
                user_agent: Some("TestAgent".into()),
            },
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_and_session() {
        let repo = MemoryAuthRepository::new();
        let output = use_case(&repo).execute(ana()).await.unwrap();

        assert_eq!(output.user.role, UserRole::User);
        assert_eq!(output.user.email, "ana@x.com");
        assert_eq!(
            output.user.profile_image.as_deref(),
            Some(DEFAULT_PROFILE_IMAGE)
        );

        let current = repo
            .find_user_by_token(&output.session.token, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, output.user.id);

        let log = repo.activity().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, "register");
        assert_eq!(log[0].ip_address.as_deref(), Some("10.0.0.9"));
        assert_eq!(
            log[0].details.as_deref(),
            Some("User registered and logged in from TestAgent")
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let repo = MemoryAuthRepository::new();
        use_case(&repo).execute(ana()).await.unwrap();

        let err = use_case(&repo).execute(ana()).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let repo = MemoryAuthRepository::new();

        let missing = RegisterInput {
            name: String::new(),
            ..ana()
        };
        let mismatch = RegisterInput {
            confirm_password: "other".into(),
            ..ana()
        };
        let no_terms = RegisterInput {
            agree_terms: false,
            ..ana()
        };

        for (input, message) in [
            (missing, "All fields are required"),
            (mismatch, "Passwords do not match"),
            (no_terms, "You must agree to the terms and conditions"),
        ] {
            match use_case(&repo).execute(input).await {
                Err(AuthError::Validation(m)) => assert_eq!(m, message),
                other => panic!("expected validation error, got {:?}", other.err()),
            }
        }
        assert!(repo.list().await.unwrap().is_empty());
    }
}
