//! GitHub Login Use Case
//!
//! Exchanges an OAuth code, finds or creates the matching local account,
//! links it and opens a session.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::crypto::random_token;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::support::{open_session, record_activity};
use crate::domain::entity::user::DEFAULT_PROFILE_IMAGE;
use crate::domain::entity::{
    ActivityAction, NewActivity, NewUser, OAuthAccount, OAuthIdentity, Session, User, UserProfile,
};
use crate::domain::repository::{
    ActivityLogRepository, OAuthAccountRepository, OAuthProvider, SessionRepository,
    UserRepository,
};
use crate::domain::value_object::{Email, UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub struct GithubLoginOutput {
    pub user: UserProfile,
    pub session: Session,
    /// True when this login created the local account
    pub created: bool,
}

pub struct GithubLoginUseCase<R, P>
where
    R: UserRepository + SessionRepository + ActivityLogRepository + OAuthAccountRepository,
    P: OAuthProvider,
{
    repo: Arc<R>,
    provider: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<R, P> GithubLoginUseCase<R, P>
where
    R: UserRepository + SessionRepository + ActivityLogRepository + OAuthAccountRepository,
    P: OAuthProvider,
{
    pub fn new(repo: Arc<R>, provider: Arc<P>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            provider,
            config,
        }
    }

    pub async fn execute(&self, code: &str, client: &ClientInfo) -> AuthResult<GithubLoginOutput> {
        if code.trim().is_empty() {
            return Err(AuthError::Validation(
                "Authorization code is required".into(),
            ));
        }

        let access_token = self.provider.exchange_code(code.trim()).await?;
        let identity = self.provider.fetch_identity(&access_token).await?;

        let email = identity
            .email
            .as_deref()
            .ok_or_else(|| AuthError::OAuthRejected("No email found in GitHub account".into()))
            .and_then(Email::new)?;

        let (user, created) = self.find_or_create(&identity, email).await?;

        OAuthAccountRepository::link(
            self.repo.as_ref(),
            &OAuthAccount {
                user_id: user.id,
                provider: self.provider.name().to_string(),
                provider_user_id: identity.provider_user_id.clone(),
                access_token,
            },
        )
        .await?;

        let session = open_session(self.repo.as_ref(), user.id, &self.config).await?;

        record_activity(
            self.repo.as_ref(),
            NewActivity::new(
                user.id,
                ActivityAction::Login,
                "User logged in with GitHub",
                client.ip_string(),
            ),
        )
        .await;

        tracing::info!(
            user_id = %user.id,
            provider = self.provider.name(),
            created,
            "User logged in via OAuth"
        );

        Ok(GithubLoginOutput {
            user: user.profile(),
            session,
            created,
        })
    }

    /// Existing link first, then an account with the same email, then a new
    /// account whose password nobody knows.
    async fn find_or_create(&self, identity: &OAuthIdentity, email: Email) -> AuthResult<(User, bool)> {
        let linked = self
            .repo
            .find_user_id(self.provider.name(), &identity.provider_user_id)
            .await?;
        if let Some(user_id) = linked {
            if let Some(user) = self.repo.find_by_id(user_id).await? {
                return Ok((user, false));
            }
        }

        if let Some(user) = self.repo.find_by_email(&email).await? {
            return Ok((user, false));
        }

        let password_hash =
            ClearTextPassword::new(random_token())?.hash(self.config.password_scheme)?;
        let user_id = UserRepository::create(
            self.repo.as_ref(),
            &NewUser {
                name: identity.name.clone(),
                email,
                password_hash,
                role: UserRole::User,
                profile_image: Some(
                    identity
                        .avatar_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string()),
                ),
                bio: None,
            },
        )
        .await?;

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("created user vanished".into()))?;
        Ok((user, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryAuthRepository;

    struct FakeGithub {
        identity: OAuthIdentity,
    }

    impl OAuthProvider for FakeGithub {
        fn name(&self) -> &'static str {
            "github"
        }

        async fn exchange_code(&self, code: &str) -> AuthResult<String> {
            if code == "bad" {
                return Err(AuthError::OAuthRejected("bad_verification_code".into()));
            }
            Ok(format!("token-for-{code}"))
        }

        async fn fetch_identity(&self, _access_token: &str) -> AuthResult<OAuthIdentity> {
            Ok(self.identity.clone())
        }
    }

    fn identity(email: Option<&str>) -> OAuthIdentity {
        OAuthIdentity {
            provider_user_id: "4242".into(),
            name: "Octo Cat".into(),
            email: email.map(str::to_string),
            avatar_url: Some("https://avatars.example/4242".into()),
        }
    }

    fn use_case(
        repo: &MemoryAuthRepository,
        email: Option<&str>,
    ) -> GithubLoginUseCase<MemoryAuthRepository, FakeGithub> {
        GithubLoginUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(FakeGithub {
                identity: identity(email),
            }),
            Arc::new(AuthConfig::development()),
        )
    }

    #[tokio::test]
    async fn test_first_login_creates_and_links_user() {
        let repo = MemoryAuthRepository::new();
        let out = use_case(&repo, Some("octo@x.com"))
            .execute("abc", &ClientInfo::default())
            .await
            .unwrap();

        assert!(out.created);
        assert_eq!(out.user.role, UserRole::User);
        assert_eq!(
            out.user.profile_image.as_deref(),
            Some("https://avatars.example/4242")
        );

        let links = repo.oauth_links().await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].access_token, "token-for-abc");

        let log = repo.activity().await;
        assert_eq!(log[0].action, "login");
        assert_eq!(log[0].details.as_deref(), Some("User logged in with GitHub"));
    }

    #[tokio::test]
    async fn test_second_login_reuses_link_and_refreshes_token() {
        let repo = MemoryAuthRepository::new();
        let first = use_case(&repo, Some("octo@x.com"))
            .execute("abc", &ClientInfo::default())
            .await
            .unwrap();
        let second = use_case(&repo, Some("octo@x.com"))
            .execute("def", &ClientInfo::default())
            .await
            .unwrap();

        assert!(!second.created);
        assert_eq!(first.user.id, second.user.id);
        let links = repo.oauth_links().await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].access_token, "token-for-def");
    }

    #[tokio::test]
    async fn test_existing_email_account_is_linked() {
        let repo = MemoryAuthRepository::new();
        let existing = repo
            .seed_user("Octo", "octo@x.com", "pw", UserRole::Editor)
            .await
            .unwrap();

        let out = use_case(&repo, Some("octo@x.com"))
            .execute("abc", &ClientInfo::default())
            .await
            .unwrap();

        assert!(!out.created);
        assert_eq!(out.user.id, existing.id);
        assert_eq!(out.user.role, UserRole::Editor);
    }

    #[tokio::test]
    async fn test_missing_email_and_bad_code() {
        let repo = MemoryAuthRepository::new();

        let no_email = use_case(&repo, None)
            .execute("abc", &ClientInfo::default())
            .await;
        assert!(matches!(no_email, Err(AuthError::OAuthRejected(_))));

        let bad = use_case(&repo, Some("octo@x.com"))
            .execute("bad", &ClientInfo::default())
            .await;
        assert!(matches!(bad, Err(AuthError::OAuthRejected(_))));

        let empty = use_case(&repo, Some("octo@x.com"))
            .execute(" ", &ClientInfo::default())
            .await;
        assert!(matches!(empty, Err(AuthError::Validation(_))));

        assert!(repo.list().await.unwrap().is_empty());
    }
}
