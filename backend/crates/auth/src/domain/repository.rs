//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::{
    ActivityLogEntry, NewActivity, NewSession, NewUser, OAuthAccount, OAuthIdentity, Session,
    User, UserChanges,
};
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// Credential store
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user. Fails with `AuthError::EmailTaken` on a duplicate email.
    async fn create(&self, user: &NewUser) -> AuthResult<UserId>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// All users, newest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Rewrite the row. Returns false when no row has this id.
    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<bool>;

    /// Hard delete. Returns false when no row has this id.
    async fn delete(&self, id: UserId) -> AuthResult<bool>;
}

/// Session store
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create_session(&self, session: &NewSession) -> AuthResult<Session>;

    /// Owner of `token` if the session has `expires_at > now`
    async fn find_user_by_token(&self, token: &str, now: DateTime<Utc>)
    -> AuthResult<Option<User>>;

    /// Number of rows removed (0 or 1)
    async fn delete_by_token(&self, token: &str) -> AuthResult<u64>;

    /// Remove rows with `expires_at <= now`
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}

/// Activity log
#[trait_variant::make(ActivityLogRepository: Send)]
pub trait LocalActivityLogRepository {
    async fn append(&self, entry: &NewActivity) -> AuthResult<()>;

    /// Newest first, at most `limit` entries
    async fn list_for_user(&self, user_id: UserId, limit: u32)
    -> AuthResult<Vec<ActivityLogEntry>>;
}

/// OAuth account links
#[trait_variant::make(OAuthAccountRepository: Send)]
pub trait LocalOAuthAccountRepository {
    async fn find_user_id(&self, provider: &str, provider_user_id: &str)
    -> AuthResult<Option<UserId>>;

    /// Insert the link, or refresh the stored access token if it exists
    async fn link(&self, account: &OAuthAccount) -> AuthResult<()>;
}

/// External identity provider (GitHub)
#[trait_variant::make(OAuthProvider: Send)]
pub trait LocalOAuthProvider {
    /// Provider name stored in `oauth_accounts.provider`
    fn name(&self) -> &'static str;

    /// Exchange an authorization code for an access token
    async fn exchange_code(&self, code: &str) -> AuthResult<String>;

    async fn fetch_identity(&self, access_token: &str) -> AuthResult<OAuthIdentity>;
}

/// Everything the auth HTTP surface needs from storage
pub trait AuthStore:
    UserRepository
    + SessionRepository
    + ActivityLogRepository
    + OAuthAccountRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository
        + SessionRepository
        + ActivityLogRepository
        + OAuthAccountRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
