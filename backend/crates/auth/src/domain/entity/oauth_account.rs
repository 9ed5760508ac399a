//! OAuth account link (`oauth_accounts` row)

use kernel::id::UserId;

pub const GITHUB_PROVIDER: &str = "github";

#[derive(Debug, Clone)]
pub struct OAuthAccount {
    pub user_id: UserId,
    pub provider: String,
    pub provider_user_id: String,
    pub access_token: String,
}

/// Identity reported by the provider after a successful code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    pub provider_user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}
