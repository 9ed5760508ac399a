//! User Entity
//!
//! A credential-store row. `UserProfile` is the projection handed to
//! everything outside the auth crate; it never carries the password hash.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;
use serde::Serialize;

use crate::domain::value_object::{email::Email, user_role::UserRole};

/// Image shown for accounts that never uploaded one
pub const DEFAULT_PROFILE_IMAGE: &str = "/images/default-avatar.png";

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: UserRole,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.as_str().to_string(),
            role: self.role,
            profile_image: self.profile_image.clone(),
            bio: self.bio.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Changes that rewrite every column except the password
    pub fn changes(&self) -> UserChanges {
        UserChanges {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            profile_image: self.profile_image.clone(),
            bio: self.bio.clone(),
            password_hash: None,
        }
    }
}

/// Row to insert; the database assigns id and timestamps
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: UserRole,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

/// Full-row update. `password_hash` is only written when present.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub password_hash: Option<HashedPassword>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
