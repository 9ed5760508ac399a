//! Development Admin Use Case
//!
//! Ensures a well-known admin account exists. Only wired into the router
//! outside production.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::NewUser;
use crate::domain::entity::user::DEFAULT_PROFILE_IMAGE;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserRole};
use crate::error::AuthResult;

pub const DEV_ADMIN_NAME: &str = "Test Admin";
pub const DEV_ADMIN_EMAIL: &str = "admin@test.com";
pub const DEV_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug)]
pub struct DevAdminOutput {
    pub created: bool,
    pub email: &'static str,
    pub password: &'static str,
    /// Hash written for a new row; for an existing row, the stored hash
    pub hash: String,
}

pub struct DevAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> DevAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self) -> AuthResult<DevAdminOutput> {
        let email = Email::new(DEV_ADMIN_EMAIL)?;

        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            return Ok(DevAdminOutput {
                created: false,
                email: DEV_ADMIN_EMAIL,
                password: DEV_ADMIN_PASSWORD,
                hash: existing.password_hash.as_str().to_string(),
            });
        }

        let password_hash = ClearTextPassword::new(DEV_ADMIN_PASSWORD.to_string())?
            .hash(self.config.password_scheme)?;
        let hash = password_hash.as_str().to_string();

        self.user_repo
            .create(&NewUser {
                name: DEV_ADMIN_NAME.to_string(),
                email,
                password_hash,
                role: UserRole::Admin,
                profile_image: Some(DEFAULT_PROFILE_IMAGE.to_string()),
                bio: None,
            })
            .await?;

        tracing::warn!(email = DEV_ADMIN_EMAIL, "Development admin user created");

        Ok(DevAdminOutput {
            created: true,
            email: DEV_ADMIN_EMAIL,
            password: DEV_ADMIN_PASSWORD,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryAuthRepository;
    use platform::crypto::sha256_hex;

    #[tokio::test]
    async fn test_dev_admin_created_once() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let uc = DevAdminUseCase::new(repo.clone(), Arc::new(AuthConfig::development()));

        let first = uc.execute().await.unwrap();
        let second = uc.execute().await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.hash, sha256_hex(DEV_ADMIN_PASSWORD.as_bytes()));
        assert_eq!(second.hash, first.hash);

        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, UserRole::Admin);
    }
}
