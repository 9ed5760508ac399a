//! Current User Use Case
//!
//! Resolves a session token to the owning user's profile. Expired rows are
//! ignored, not deleted.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::UserProfile;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

pub struct CurrentUserUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> CurrentUserUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<Option<UserProfile>> {
        if token.is_empty() {
            return Ok(None);
        }
        let user = self
            .session_repo
            .find_user_by_token(token, Utc::now())
            .await?;
        Ok(user.map(|u| u.profile()))
    }
}
