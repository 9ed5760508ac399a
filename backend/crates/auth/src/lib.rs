//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, authorization gate
//! - `application/` - Use cases
//! - `infra/` - MySQL, in-memory and GitHub implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email/password registration and login, GitHub OAuth login
//! - Server-side sessions referenced by an HTTP-only `session_token` cookie
//! - Roles `admin`, `editor`, `user`; one `authorize` check for every admin operation
//! - Activity log of logins, logouts, registrations and user administration

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::authorization::{Capability, authorize};
pub use domain::entity::UserProfile;
pub use domain::repository::AuthStore;
pub use error::{AuthError, AuthResult};
pub use infra::{GithubCredentials, GithubOAuthProvider, MemoryAuthRepository, MySqlAuthRepository};
pub use presentation::{
    AuthAppState, AuthMiddlewareState, AuthStatus, attach_current_user, auth_router, dev_router,
};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
