//! Process configuration read from the environment

use std::net::SocketAddr;

use anyhow::Context;
use auth::GithubCredentials;
use platform::password::PasswordScheme;
use sqlx::mysql::MySqlConnectOptions;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub mysql_host: String,
    pub mysql_port: u16,
    pub mysql_user: String,
    pub mysql_password: String,
    pub mysql_database: String,
    pub max_connections: u32,
    /// `NODE_ENV=production`
    pub production: bool,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub github: Option<GithubCredentials>,
    pub password_scheme: PasswordScheme,
    pub session_cleanup_on_start: bool,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let github = match (
            get("GITHUB_CLIENT_ID").or_else(|| get("NEXT_PUBLIC_GITHUB_CLIENT_ID")),
            get("GITHUB_CLIENT_SECRET"),
        ) {
            (Some(client_id), Some(client_secret)) => Some(GithubCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        Ok(Self {
            mysql_host: or("MYSQL_HOST", "localhost"),
            mysql_port: or("MYSQL_PORT", "3306")
                .parse()
                .context("MYSQL_PORT must be a port number")?,
            mysql_user: or("MYSQL_USER", "root"),
            mysql_password: or("MYSQL_PASSWORD", ""),
            mysql_database: or("MYSQL_DATABASE", "jovixai_db"),
            max_connections: or("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            production: or("NODE_ENV", "development") == "production",
            bind_addr: or("BIND_ADDR", "0.0.0.0:3001")
                .parse()
                .context("BIND_ADDR must be host:port")?,
            frontend_origins: or("FRONTEND_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            github,
            password_scheme: or("PASSWORD_SCHEME", "sha256")
                .parse()
                .context("PASSWORD_SCHEME must be sha256 or argon2id")?,
            session_cleanup_on_start: matches!(
                or("SESSION_CLEANUP_ON_START", "false").to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ),
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.mysql_host)
            .port(self.mysql_port)
            .username(&self.mysql_user)
            .password(&self.mysql_password)
            .database(&self.mysql_database)
    }
}
