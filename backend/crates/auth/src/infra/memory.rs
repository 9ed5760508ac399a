//! In-memory repository
//!
//! Implements every auth repository trait over plain vectors, with the
//! same constraint behaviour as the MySQL schema: unique email, cascading
//! session and OAuth rows on user delete, SET NULL on the activity log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{ActivityLogId, SessionId, UserId};
use platform::password::{ClearTextPassword, PasswordScheme};
use tokio::sync::Mutex;

use crate::domain::entity::{
    ActivityLogEntry, NewActivity, NewSession, NewUser, OAuthAccount, Session, User, UserChanges,
};
use crate::domain::repository::{
    ActivityLogRepository, OAuthAccountRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{Email, UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    users: Vec<User>,
    sessions: Vec<Session>,
    activity: Vec<ActivityLogEntry>,
    oauth: Vec<OAuthAccount>,
    next_user_id: i64,
    next_session_id: i64,
    next_activity_id: i64,
}

impl State {
    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|u| u.email.as_str().eq_ignore_ascii_case(email.as_str()) && Some(u.id) != except)
    }
}

#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored session rows, expired ones included
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    /// Force a session's expiry, for exercising the expired path
    pub async fn set_session_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> bool {
        let mut state = self.state.lock().await;
        match state.sessions.iter_mut().find(|s| s.token == token) {
            Some(session) => {
                session.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    /// Every activity row, oldest first
    pub async fn activity(&self) -> Vec<ActivityLogEntry> {
        self.state.lock().await.activity.clone()
    }

    pub async fn oauth_links(&self) -> Vec<OAuthAccount> {
        self.state.lock().await.oauth.clone()
    }

    /// Insert a user with a SHA-256 password hash and return the stored row
    pub async fn seed_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AuthResult<User> {
        let password_hash = ClearTextPassword::new(password.to_string())?.hash(PasswordScheme::Sha256)?;
        let id = self
            .create(&NewUser {
                name: name.to_string(),
                email: Email::new(email)?,
                password_hash,
                role,
                profile_image: None,
                bio: None,
            })
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::Internal("seeded user missing".into()))
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let mut state = self.state.lock().await;
        if state.email_taken(&user.email, None) {
            return Err(AuthError::EmailTaken);
        }

        state.next_user_id += 1;
        let id = UserId::new(state.next_user_id);
        let now = Utc::now();
        state.users.push(User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            profile_image: user.profile_image.clone(),
            bio: user.bio.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.email.as_str().eq_ignore_ascii_case(email.as_str()))
            .cloned())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut users = state.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<bool> {
        let mut state = self.state.lock().await;
        if state.email_taken(&changes.email, Some(id)) {
            return Err(AuthError::EmailTaken);
        }

        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.name = changes.name.clone();
        user.email = changes.email.clone();
        user.role = changes.role;
        user.profile_image = changes.profile_image.clone();
        user.bio = changes.bio.clone();
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }

        state.sessions.retain(|s| s.user_id != id);
        state.oauth.retain(|o| o.user_id != id);
        for entry in state.activity.iter_mut() {
            if entry.user_id == Some(id) {
                entry.user_id = None;
            }
        }
        Ok(true)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for MemoryAuthRepository {
    async fn create_session(&self, session: &NewSession) -> AuthResult<Session> {
        let mut state = self.state.lock().await;
        if !state.users.iter().any(|u| u.id == session.user_id) {
            return Err(AuthError::Internal("session owner does not exist".into()));
        }

        state.next_session_id += 1;
        let stored = Session {
            id: SessionId::new(state.next_session_id),
            user_id: session.user_id,
            token: session.token.clone(),
            expires_at: session.expires_at,
            created_at: Utc::now(),
        };
        state.sessions.push(stored.clone());
        Ok(stored)
    }

    async fn find_user_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>> {
        let state = self.state.lock().await;
        let Some(session) = state
            .sessions
            .iter()
            .find(|s| s.token == token && s.is_valid_at(now))
        else {
            return Ok(None);
        };
        Ok(state.users.iter().find(|u| u.id == session.user_id).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> AuthResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.token != token);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.is_valid_at(now));
        Ok((before - state.sessions.len()) as u64)
    }
}

// ============================================================================
// Activity Log Repository Implementation
// ============================================================================

impl ActivityLogRepository for MemoryAuthRepository {
    async fn append(&self, entry: &NewActivity) -> AuthResult<()> {
        let mut state = self.state.lock().await;
        state.next_activity_id += 1;
        let id = ActivityLogId::new(state.next_activity_id);
        state.activity.push(ActivityLogEntry {
            id,
            user_id: entry.user_id,
            action: entry.action.to_string(),
            details: Some(entry.details.clone()),
            ip_address: entry.ip_address.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> AuthResult<Vec<ActivityLogEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .filter(|e| e.user_id == Some(user_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ============================================================================
// OAuth Account Repository Implementation
// ============================================================================

impl OAuthAccountRepository for MemoryAuthRepository {
    async fn find_user_id(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AuthResult<Option<UserId>> {
        let state = self.state.lock().await;
        Ok(state
            .oauth
            .iter()
            .find(|o| o.provider == provider && o.provider_user_id == provider_user_id)
            .map(|o| o.user_id))
    }

    async fn link(&self, account: &OAuthAccount) -> AuthResult<()> {
        let mut state = self.state.lock().await;
        match state.oauth.iter_mut().find(|o| {
            o.provider == account.provider && o.provider_user_id == account.provider_user_id
        }) {
            Some(existing) => {
                existing.user_id = account.user_id;
                existing.access_token = account.access_token.clone();
            }
            None => state.oauth.push(account.clone()),
        }
        Ok(())
    }
}
