//! GitHub OAuth client

use serde::Deserialize;

use crate::domain::entity::OAuthIdentity;
use crate::domain::entity::oauth_account::GITHUB_PROVIDER;
use crate::domain::repository::OAuthProvider;
use crate::error::{AuthError, AuthResult};

const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "jovix-api";

#[derive(Debug, Clone)]
pub struct GithubCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// `exchange_code` and `fetch_identity` fail with `OAuthUnavailable` when
/// no credentials are configured.
#[derive(Clone)]
pub struct GithubOAuthProvider {
    client: reqwest::Client,
    credentials: Option<GithubCredentials>,
}

impl GithubOAuthProvider {
    pub fn new(credentials: Option<GithubCredentials>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> AuthResult<&GithubCredentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| AuthError::OAuthUnavailable("GitHub login is not configured".into()))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        access_token: &str,
    ) -> AuthResult<T> {
        let url = format!("{API_BASE}/{path}");
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(path = %path, error = %e, "GitHub API request failed");
                AuthError::OAuthUnavailable("upstream request failed".into())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path = %path, status = %status, "GitHub API returned error");
            return Err(AuthError::OAuthRejected(format!("GitHub API returned {status}")));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to parse GitHub response");
            AuthError::OAuthUnavailable("failed to parse upstream response".into())
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    #[serde(default)]
    primary: bool,
}

/// Primary address, else the first one listed
fn pick_email(emails: Vec<GithubEmail>) -> Option<String> {
    let primary = emails.iter().position(|e| e.primary).unwrap_or(0);
    emails.into_iter().nth(primary).map(|e| e.email)
}

impl OAuthProvider for GithubOAuthProvider {
    fn name(&self) -> &'static str {
        GITHUB_PROVIDER
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<String> {
        let credentials = self.credentials()?;

        let response = self
            .client
            .post(TOKEN_URL)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({
                "client_id": credentials.client_id,
                "client_secret": credentials.client_secret,
                "code": code,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "GitHub token exchange failed");
                AuthError::OAuthUnavailable("upstream request failed".into())
            })?;

        let body: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse GitHub token response");
            AuthError::OAuthUnavailable("failed to parse upstream response".into())
        })?;

        match (body.access_token, body.error) {
            (Some(token), None) => Ok(token),
            (_, error) => Err(AuthError::OAuthRejected(
                body.error_description
                    .or(error)
                    .unwrap_or_else(|| "Failed to get access token".into()),
            )),
        }
    }

    async fn fetch_identity(&self, access_token: &str) -> AuthResult<OAuthIdentity> {
        let user: GithubUser = self.get_json("user", access_token).await?;
        let emails: Vec<GithubEmail> = self.get_json("user/emails", access_token).await?;

        Ok(OAuthIdentity {
            provider_user_id: user.id.to_string(),
            name: user.name.filter(|n| !n.trim().is_empty()).unwrap_or(user.login),
            email: pick_email(emails),
            avatar_url: user.avatar_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(address: &str, primary: bool) -> GithubEmail {
        GithubEmail {
            email: address.into(),
            primary,
        }
    }

    #[test]
    fn test_pick_email_prefers_primary() {
        let picked = pick_email(vec![email("a@x.com", false), email("b@x.com", true)]);
        assert_eq!(picked.as_deref(), Some("b@x.com"));
    }

    #[test]
    fn test_pick_email_falls_back_to_first() {
        let picked = pick_email(vec![email("a@x.com", false), email("b@x.com", false)]);
        assert_eq!(picked.as_deref(), Some("a@x.com"));
        assert_eq!(pick_email(Vec::new()), None);
    }

    #[test]
    fn test_user_payload_parses() {
        let user: GithubUser = serde_json::from_str(
            r#"{"id": 42, "login": "octo", "name": null, "avatar_url": "https://a/42"}"#,
        )
        .unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.login, "octo");
        assert!(user.name.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_unavailable() {
        let provider = GithubOAuthProvider::new(None);
        assert!(!provider.is_configured());
        assert!(matches!(
            provider.exchange_code("abc").await,
            Err(AuthError::OAuthUnavailable(_))
        ));
    }
}
