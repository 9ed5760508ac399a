//! MySQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::{ActivityLogId, SessionId, UserId};
use platform::password::HashedPassword;
use sqlx::MySqlPool;

use crate::domain::entity::{
    ActivityLogEntry, NewActivity, NewSession, NewUser, OAuthAccount, Session, User, UserChanges,
};
use crate::domain::repository::{
    ActivityLogRepository, OAuthAccountRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{Email, UserRole};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str =
    "u.id, u.name, u.email, u.password, u.role, u.profile_image, u.bio, u.created_at, u.updated_at";

/// MySQL-backed auth repository
#[derive(Clone)]
pub struct MySqlAuthRepository {
    pool: MySqlPool,
}

impl MySqlAuthRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn user_exists(&self, id: UserId) -> AuthResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

fn map_write_error(err: sqlx::Error) -> AuthError {
    if is_unique_violation(&err) {
        AuthError::EmailTaken
    } else {
        AuthError::Database(err)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for MySqlAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, role, profile_image, bio)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.role.code())
        .bind(&user.profile_image)
        .bind(&user.bio)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(UserId::new(result.last_insert_id() as i64))
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.email = ?"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u ORDER BY u.created_at DESC, u.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<bool> {
        let query = match &changes.password_hash {
            Some(hash) => sqlx::query(
                r#"
                UPDATE users
                SET name = ?, email = ?, role = ?, profile_image = ?, bio = ?, password = ?
                WHERE id = ?
                "#,
            )
            .bind(&changes.name)
            .bind(changes.email.as_str())
            .bind(changes.role.code())
            .bind(&changes.profile_image)
            .bind(&changes.bio)
            .bind(hash.as_str())
            .bind(id.get()),
            None => sqlx::query(
                r#"
                UPDATE users
                SET name = ?, email = ?, role = ?, profile_image = ?, bio = ?
                WHERE id = ?
                "#,
            )
            .bind(&changes.name)
            .bind(changes.email.as_str())
            .bind(changes.role.code())
            .bind(&changes.profile_image)
            .bind(&changes.bio)
            .bind(id.get()),
        };

        let affected = query
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?
            .rows_affected();

        // MySQL reports 0 affected rows when nothing changed
        if affected > 0 {
            return Ok(true);
        }
        self.user_exists(id).await
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for MySqlAuthRepository {
    async fn create_session(&self, session: &NewSession) -> AuthResult<Session> {
        let result = sqlx::query(
            "INSERT INTO user_sessions (user_id, session_token, expires_at) VALUES (?, ?, ?)",
        )
        .bind(session.user_id.get())
        .bind(&session.token)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Session {
            id: SessionId::new(result.last_insert_id() as i64),
            user_id: session.user_id,
            token: session.token.clone(),
            expires_at: session.expires_at,
            created_at: Utc::now(),
        })
    }

    async fn find_user_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_token = ? AND s.expires_at > ?
            "#
        ))
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn delete_by_token(&self, token: &str) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_sessions WHERE session_token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Activity Log Repository Implementation
// ============================================================================

impl ActivityLogRepository for MySqlAuthRepository {
    async fn append(&self, entry: &NewActivity) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_activity_log (user_id, action, details, ip_address)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(entry.user_id.map(|id| id.get()))
        .bind(entry.action.to_string())
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> AuthResult<Vec<ActivityLogEntry>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, user_id, action, details, ip_address, created_at
            FROM user_activity_log
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id.get())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ActivityRow::into_entry).collect())
    }
}

// ============================================================================
// OAuth Account Repository Implementation
// ============================================================================

impl OAuthAccountRepository for MySqlAuthRepository {
    async fn find_user_id(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AuthResult<Option<UserId>> {
        let id: Option<i64> = sqlx::query_scalar(
            "SELECT user_id FROM oauth_accounts WHERE provider = ? AND provider_user_id = ?",
        )
        .bind(provider)
        .bind(provider_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(UserId::new))
    }

    async fn link(&self, account: &OAuthAccount) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO oauth_accounts (user_id, provider, provider_user_id, access_token)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE user_id = VALUES(user_id), access_token = VALUES(access_token)
            "#,
        )
        .bind(account.user_id.get())
        .bind(&account.provider)
        .bind(&account.provider_user_id)
        .bind(&account.access_token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    profile_image: Option<String>,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        let role = UserRole::from_code(&self.role).unwrap_or_else(|| {
            tracing::warn!(user_id = self.id, role = %self.role, "Unknown role, treating as user");
            UserRole::User
        });

        User {
            id: UserId::new(self.id),
            name: self.name,
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_stored(self.password),
            role,
            profile_image: self.profile_image,
            bio: self.bio,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: i64,
    user_id: Option<i64>,
    action: String,
    details: Option<String>,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

impl ActivityRow {
    fn into_entry(self) -> ActivityLogEntry {
        ActivityLogEntry {
            id: ActivityLogId::new(self.id),
            user_id: self.user_id.map(UserId::new),
            action: self.action,
            details: self.details,
            ip_address: self.ip_address,
            created_at: self.created_at,
        }
    }
}
