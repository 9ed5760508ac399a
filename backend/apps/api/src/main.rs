//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; each feature crate maps its own
//! errors to responses.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::domain::repository::SessionRepository;
use auth::{
    AuthAppState, AuthConfig, AuthMiddlewareState, GithubOAuthProvider, MySqlAuthRepository,
    attach_current_user, auth_router, dev_router,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use content::{ContentAppState, ContentConfig, MySqlContentRepository, content_router};
use platform::revalidate::{Revalidator, log_stale_routes};
use sqlx::mysql::MySqlPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jovix_api=info,auth=info,content=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    // Database connection
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await?;

    tracing::info!(
        host = %config.mysql_host,
        database = %config.mysql_database,
        max_connections = config.max_connections,
        "Connected to database"
    );

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_repo = Arc::new(MySqlAuthRepository::new(pool.clone()));

    // Errors here should not prevent server startup
    if config.session_cleanup_on_start {
        match auth_repo.cleanup_expired(chrono::Utc::now()).await {
            Ok(sessions) => {
                tracing::info!(sessions_deleted = sessions, "Expired session cleanup completed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Expired session cleanup failed, continuing anyway");
            }
        }
    }

    let auth_config = Arc::new(AuthConfig {
        cookie_secure: config.production,
        password_scheme: config.password_scheme,
        ..AuthConfig::default()
    });

    let github = GithubOAuthProvider::new(config.github.clone());
    if !github.is_configured() {
        tracing::info!("GitHub credentials not set, GitHub login disabled");
    }

    // Stale routes are only logged until a page renderer subscribes
    let revalidator = Revalidator::default();
    tokio::spawn(log_stale_routes(revalidator.subscribe()));

    let auth_state = AuthAppState {
        repo: auth_repo.clone(),
        oauth: Arc::new(github),
        config: auth_config.clone(),
        revalidator: revalidator.clone(),
    };

    let content_state = ContentAppState {
        repo: Arc::new(MySqlContentRepository::new(pool.clone())),
        config: Arc::new(ContentConfig::default()),
        revalidator,
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let mut routes = Router::new()
        .merge(auth_router(auth_state.clone()))
        .merge(content_router(content_state));

    if config.production {
        tracing::info!("Production mode, dev admin endpoint disabled");
    } else {
        routes = routes.merge(dev_router(auth_state));
    }

    let app = attach_current_user(
        routes,
        AuthMiddlewareState {
            repo: auth_repo,
            config: auth_config,
        },
    )
    .layer(TraceLayer::new_for_http())
    .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
