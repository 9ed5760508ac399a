//! User Administration Use Case
//!
//! Admin-only CRUD over the credential store plus the per-user activity
//! view. Callers authorize before reaching this type.

use std::sync::Arc;

use kernel::id::UserId;
use platform::client::ClientInfo;
use platform::password::ClearTextPassword;
use platform::revalidate::Revalidator;

use crate::application::config::AuthConfig;
use crate::application::support::record_activity;
use crate::domain::entity::{
    ActivityAction, ActivityLogEntry, NewActivity, NewUser, UserChanges, UserProfile,
};
use crate::domain::repository::{ActivityLogRepository, UserRepository};
use crate::domain::value_object::{Email, UserRole};
use crate::error::{AuthError, AuthResult};

/// Route that lists users in the dashboard
pub const ADMIN_USERS_PATH: &str = "/admin/users";

/// Default page size of the activity view
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 50;

pub struct UserForm {
    pub name: String,
    pub email: String,
    /// Required on create. On update, empty keeps the current hash.
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

pub struct ManageUsersUseCase<U, L>
where
    U: UserRepository,
    L: ActivityLogRepository,
{
    user_repo: Arc<U>,
    activity_repo: Arc<L>,
    config: Arc<AuthConfig>,
    revalidator: Revalidator,
}

impl<U, L> ManageUsersUseCase<U, L>
where
    U: UserRepository,
    L: ActivityLogRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        activity_repo: Arc<L>,
        config: Arc<AuthConfig>,
        revalidator: Revalidator,
    ) -> Self {
        Self {
            user_repo,
            activity_repo,
            config,
            revalidator,
        }
    }

    pub async fn list(&self) -> AuthResult<Vec<UserProfile>> {
        let users = self.user_repo.list().await?;
        Ok(users.iter().map(|u| u.profile()).collect())
    }

    pub async fn get(&self, id: UserId) -> AuthResult<UserProfile> {
        self.user_repo
            .find_by_id(id)
            .await?
            .map(|u| u.profile())
            .ok_or(AuthError::NoSuchUser)
    }

    pub async fn create(
        &self,
        actor: &UserProfile,
        client: &ClientInfo,
        form: UserForm,
    ) -> AuthResult<UserProfile> {
        let password = form.password.clone().unwrap_or_default();
        if form.name.trim().is_empty() || form.email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Name, email, and password are required".into(),
            ));
        }

        let email = Email::new(form.email)?;
        let password_hash = ClearTextPassword::new(password)?.hash(self.config.password_scheme)?;

        let id = self
            .user_repo
            .create(&NewUser {
                name: form.name.trim().to_string(),
                email: email.clone(),
                password_hash,
                role: form.role.unwrap_or_default(),
                profile_image: non_empty(form.profile_image),
                bio: non_empty(form.bio),
            })
            .await?;

        self.after_mutation(
            actor,
            client,
            ActivityAction::UserCreate,
            format!("Created user {email}"),
        )
        .await;
        tracing::info!(user_id = %id, actor_id = %actor.id, "User created by admin");

        self.get(id).await
    }

    pub async fn update(
        &self,
        actor: &UserProfile,
        client: &ClientInfo,
        id: UserId,
        form: UserForm,
    ) -> AuthResult<UserProfile> {
        if form.name.trim().is_empty() || form.email.trim().is_empty() {
            return Err(AuthError::Validation("Name and email are required".into()));
        }

        let password_hash = match non_empty(form.password) {
            Some(raw) => Some(ClearTextPassword::new(raw)?.hash(self.config.password_scheme)?),
            None => None,
        };

        let changes = UserChanges {
            name: form.name.trim().to_string(),
            email: Email::new(form.email)?,
            role: form.role.unwrap_or_default(),
            profile_image: non_empty(form.profile_image),
            bio: non_empty(form.bio),
            password_hash,
        };

        if !self.user_repo.update(id, &changes).await? {
            return Err(AuthError::NoSuchUser);
        }

        self.after_mutation(
            actor,
            client,
            ActivityAction::UserUpdate,
            format!("Updated user {}", changes.email),
        )
        .await;
        tracing::info!(user_id = %id, actor_id = %actor.id, "User updated by admin");

        self.get(id).await
    }

    pub async fn delete(
        &self,
        actor: &UserProfile,
        client: &ClientInfo,
        id: UserId,
    ) -> AuthResult<()> {
        if !self.user_repo.delete(id).await? {
            return Err(AuthError::NoSuchUser);
        }

        self.after_mutation(
            actor,
            client,
            ActivityAction::UserDelete,
            format!("Deleted user {id}"),
        )
        .await;
        tracing::info!(user_id = %id, actor_id = %actor.id, "User deleted by admin");
        Ok(())
    }

    /// Newest first
    pub async fn activity(&self, id: UserId, limit: Option<u32>) -> AuthResult<Vec<ActivityLogEntry>> {
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT).clamp(1, 500);
        self.activity_repo.list_for_user(id, limit).await
    }

    async fn after_mutation(
        &self,
        actor: &UserProfile,
        client: &ClientInfo,
        action: ActivityAction,
        details: String,
    ) {
        record_activity(
            self.activity_repo.as_ref(),
            NewActivity::new(actor.id, action, details, client.ip_string()),
        )
        .await;
        self.revalidator.revalidate(ADMIN_USERS_PATH);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::NewSession;
    use crate::domain::repository::SessionRepository;
    use crate::infra::memory::MemoryAuthRepository;
    use chrono::{Duration, Utc};
    use platform::password::HashedPassword;

    fn use_case(
        repo: &MemoryAuthRepository,
        revalidator: Revalidator,
    ) -> ManageUsersUseCase<MemoryAuthRepository, MemoryAuthRepository> {
        let repo = Arc::new(repo.clone());
        ManageUsersUseCase::new(
            repo.clone(),
            repo,
            Arc::new(AuthConfig::development()),
            revalidator,
        )
    }

    fn form(email: &str, password: Option<&str>) -> UserForm {
        UserForm {
            name: "Ed Itor".into(),
            email: email.into(),
            password: password.map(str::to_string),
            role: Some(UserRole::Editor),
            profile_image: Some("  ".into()),
            bio: Some("Writes things".into()),
        }
    }

    async fn admin(repo: &MemoryAuthRepository) -> UserProfile {
        repo.seed_user("Admin", "admin@x.com", "admin123", UserRole::Admin)
            .await
            .unwrap()
            .profile()
    }

    #[tokio::test]
    async fn test_create_user_and_revalidate() {
        let repo = MemoryAuthRepository::new();
        let actor = admin(&repo).await;
        let bus = Revalidator::default();
        let mut rx = bus.subscribe();

        let created = use_case(&repo, bus)
            .create(&actor, &ClientInfo::default(), form("ed@x.com", Some("pw")))
            .await
            .unwrap();

        assert_eq!(created.role, UserRole::Editor);
        assert_eq!(created.profile_image, None);
        assert_eq!(created.bio.as_deref(), Some("Writes things"));
        assert_eq!(rx.recv().await.unwrap(), ADMIN_USERS_PATH);
        assert_eq!(repo.activity().await[0].action, "user_create");
    }

    #[tokio::test]
    async fn test_mutations_log_caller_ip() {
        let repo = MemoryAuthRepository::new();
        let actor = admin(&repo).await;
        let uc = use_case(&repo, Revalidator::default());
        let client = ClientInfo {
            ip: Some("203.0.113.7".parse().unwrap()),
            user_agent: None,
        };

        let ed = uc
            .create(&actor, &client, form("ed@x.com", Some("pw")))
            .await
            .unwrap();
        uc.update(&actor, &client, ed.id, form("ed@x.com", None))
            .await
            .unwrap();
        uc.delete(&actor, &client, ed.id).await.unwrap();

        let log = repo.activity().await;
        assert_eq!(log.len(), 3);
        assert!(
            log.iter()
                .all(|e| e.ip_address.as_deref() == Some("203.0.113.7"))
        );
    }

    #[tokio::test]
    async fn test_create_requires_password_and_unique_email() {
        let repo = MemoryAuthRepository::new();
        let actor = admin(&repo).await;
        let uc = use_case(&repo, Revalidator::default());

        let missing = uc.create(&actor, &ClientInfo::default(), form("ed@x.com", None)).await;
        assert!(matches!(missing, Err(AuthError::Validation(_))));

        let dup = uc.create(&actor, &ClientInfo::default(), form("admin@x.com", Some("pw"))).await;
        assert!(matches!(dup, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_update_rehashes_only_when_password_given() {
        let repo = MemoryAuthRepository::new();
        let actor = admin(&repo).await;
        let uc = use_case(&repo, Revalidator::default());
        let ed = uc.create(&actor, &ClientInfo::default(), form("ed@x.com", Some("first"))).await.unwrap();

        let hash_of = |repo: MemoryAuthRepository, id: UserId| async move {
            repo.find_by_id(id).await.unwrap().unwrap().password_hash
        };
        let original: HashedPassword = hash_of(repo.clone(), ed.id).await;

        uc.update(&actor, &ClientInfo::default(), ed.id, form("ed@x.com", Some(""))).await.unwrap();
        assert_eq!(hash_of(repo.clone(), ed.id).await, original);

        uc.update(&actor, &ClientInfo::default(), ed.id, form("ed@x.com", Some("second")))
            .await
            .unwrap();
        let updated = hash_of(repo.clone(), ed.id).await;
        assert_ne!(updated, original);
        assert!(updated.verify(&ClearTextPassword::new("second".into()).unwrap()));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_user() {
        let repo = MemoryAuthRepository::new();
        let actor = admin(&repo).await;
        let uc = use_case(&repo, Revalidator::default());

        let update = uc.update(&actor, &ClientInfo::default(), UserId::new(999), form("x@x.com", None)).await;
        assert!(matches!(update, Err(AuthError::NoSuchUser)));
        assert!(matches!(
            uc.delete(&actor, &ClientInfo::default(), UserId::new(999)).await,
            Err(AuthError::NoSuchUser)
        ));
        assert!(matches!(uc.get(UserId::new(999)).await, Err(AuthError::NoSuchUser)));
    }

    #[tokio::test]
    async fn test_delete_cascades_sessions() {
        let repo = MemoryAuthRepository::new();
        let actor = admin(&repo).await;
        let uc = use_case(&repo, Revalidator::default());
        let ed = uc.create(&actor, &ClientInfo::default(), form("ed@x.com", Some("pw"))).await.unwrap();
        repo.create_session(&NewSession::issue(ed.id, Duration::days(7), Utc::now()))
            .await
            .unwrap();

        uc.delete(&actor, &ClientInfo::default(), ed.id).await.unwrap();

        assert_eq!(repo.session_count().await, 0);
        assert_eq!(uc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_activity_newest_first_with_limit() {
        let repo = MemoryAuthRepository::new();
        let actor = admin(&repo).await;
        let uc = use_case(&repo, Revalidator::default());
        uc.create(&actor, &ClientInfo::default(), form("a@x.com", Some("pw"))).await.unwrap();
        uc.create(&actor, &ClientInfo::default(), form("b@x.com", Some("pw"))).await.unwrap();
        uc.create(&actor, &ClientInfo::default(), form("c@x.com", Some("pw"))).await.unwrap();

        let entries = uc.activity(actor.id, Some(2)).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].details.as_deref(), Some("Created user c@x.com"));
        assert_eq!(entries[1].details.as_deref(), Some("Created user b@x.com"));
    }
}
