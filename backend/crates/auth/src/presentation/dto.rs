//! API DTOs (Data Transfer Objects)

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::UserProfile;
use crate::domain::value_object::UserRole;

// ============================================================================
// Register / Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub agree_terms: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubLoginRequest {
    #[serde(default)]
    pub code: String,
}

/// Body of every endpoint that answers with the signed-in user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// Session Check
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CheckUser>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_image: Option<String>,
}

impl From<UserProfile> for CheckUser {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            profile_image: user.profile_image,
        }
    }
}

// ============================================================================
// Profile / User Administration
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "profile_image")]
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    #[serde(alias = "new_password", alias = "password")]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    #[serde(alias = "profile_image")]
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<u32>,
}

// ============================================================================
// Development Admin
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DevAdminResponse {
    pub message: &'static str,
    pub user: DevAdminCredentials,
}

#[derive(Debug, Clone, Serialize)]
pub struct DevAdminCredentials {
    pub email: &'static str,
    pub password: &'static str,
    pub hash: String,
}
