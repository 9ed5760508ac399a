//! Update Profile Use Case
//!
//! A signed-in user edits their own name, picture, bio and optionally
//! password. Email and role are not self-service.

use std::sync::Arc;

use kernel::id::UserId;
use platform::client::ClientInfo;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::support::record_activity;
use crate::domain::entity::{ActivityAction, NewActivity, UserProfile};
use crate::domain::repository::{ActivityLogRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

pub struct UpdateProfileInput {
    pub name: String,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub new_password: Option<String>,
}

pub struct UpdateProfileUseCase<U, L>
where
    U: UserRepository,
    L: ActivityLogRepository,
{
    user_repo: Arc<U>,
    activity_repo: Arc<L>,
    config: Arc<AuthConfig>,
}

impl<U, L> UpdateProfileUseCase<U, L>
where
    U: UserRepository,
    L: ActivityLogRepository,
{
    pub fn new(user_repo: Arc<U>, activity_repo: Arc<L>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            activity_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        input: UpdateProfileInput,
        client: &ClientInfo,
    ) -> AuthResult<UserProfile> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("Name is required".into()));
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        let mut changes = user.changes();
        changes.name = name.to_string();
        changes.profile_image = input
            .profile_image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        changes.bio = input
            .bio
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(raw) = input.new_password.filter(|p| !p.is_empty()) {
            changes.password_hash =
                Some(ClearTextPassword::new(raw)?.hash(self.config.password_scheme)?);
        }

        if !self.user_repo.update(user_id, &changes).await? {
            return Err(AuthError::Unauthenticated);
        }

        record_activity(
            self.activity_repo.as_ref(),
            NewActivity::new(
                user_id,
                ActivityAction::ProfileUpdate,
                "User updated profile",
                client.ip_string(),
            ),
        )
        .await;
        tracing::info!(user_id = %user_id, "Profile updated");

        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|u| u.profile())
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::UserRole;
    use crate::infra::memory::MemoryAuthRepository;

    #[tokio::test]
    async fn test_profile_update_keeps_email_and_role() {
        let repo = MemoryAuthRepository::new();
        let ana = repo
            .seed_user("Ana", "ana@x.com", "secret1", UserRole::Editor)
            .await
            .unwrap();
        let shared = Arc::new(repo.clone());
        let uc = UpdateProfileUseCase::new(
            shared.clone(),
            shared,
            Arc::new(AuthConfig::development()),
        );

        let updated = uc
            .execute(
                ana.id,
                UpdateProfileInput {
                    name: "Ana B".into(),
                    profile_image: Some("/img/ana.png".into()),
                    bio: Some("".into()),
                    new_password: Some("secret2".into()),
                },
                &ClientInfo::default(),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana B");
        assert_eq!(updated.email, "ana@x.com");
        assert_eq!(updated.role, UserRole::Editor);
        assert_eq!(updated.profile_image.as_deref(), Some("/img/ana.png"));
        assert_eq!(updated.bio, None);

        let stored = repo.find_by_id(ana.id).await.unwrap().unwrap();
        assert!(stored
            .password_hash
            .verify(&ClearTextPassword::new("secret2".into()).unwrap()));
        assert_eq!(repo.activity().await[0].action, "profile_update");
    }

    #[tokio::test]
    async fn test_profile_update_requires_name() {
        let repo = MemoryAuthRepository::new();
        let shared = Arc::new(repo);
        let uc = UpdateProfileUseCase::new(
            shared.clone(),
            shared,
            Arc::new(AuthConfig::development()),
        );
        let result = uc
            .execute(
                UserId::new(1),
                UpdateProfileInput {
                    name: "  ".into(),
                    profile_image: None,
                    bio: None,
                    new_password: None,
                },
                &ClientInfo::default(),
            )
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }
}
