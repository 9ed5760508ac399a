//! Auth Middleware
//!
//! `resolve_current_user` runs in front of every route and stores the
//! session owner (if any) in request extensions; `AuthStatus` reads it back
//! in handlers. `require_admin` gates the admin routers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Router;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::Response;

use crate::application::CurrentUserUseCase;
use crate::application::config::AuthConfig;
use crate::domain::authorization::{Capability, authorize};
use crate::domain::entity::UserProfile;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Middleware state
pub struct AuthMiddlewareState<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub repo: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> Clone for AuthMiddlewareState<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Session owner of the current request, anonymous when absent
#[derive(Debug, Clone, Default)]
pub struct AuthStatus {
    pub user: Option<UserProfile>,
}

impl AuthStatus {
    /// Shorthand for `authorize(self.user.as_ref(), capability)`
    pub fn require(&self, capability: Capability) -> AuthResult<&UserProfile> {
        authorize(self.user.as_ref(), capability)
    }
}

impl<St> FromRequestParts<St> for AuthStatus
where
    St: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<AuthStatus>().cloned().unwrap_or_default())
    }
}

/// Looks up the session cookie and inserts `AuthStatus`. Lookup failures
/// leave the request anonymous.
pub async fn resolve_current_user<S>(
    State(state): State<AuthMiddlewareState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: SessionRepository + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let user = match token {
        Some(token) => match CurrentUserUseCase::new(state.repo.clone()).execute(&token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, treating request as anonymous");
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(AuthStatus { user });
    next.run(req).await
}

/// Rejects anonymous (401) and non-admin (403) callers
pub async fn require_admin(status: AuthStatus, req: Request, next: Next) -> AuthResult<Response> {
    status.require(Capability::ViewAdmin)?;
    Ok(next.run(req).await)
}

/// Wrap `router` so every route sees `AuthStatus`
pub fn attach_current_user<S>(router: Router, state: AuthMiddlewareState<S>) -> Router
where
    S: SessionRepository + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(
        state,
        resolve_current_user::<S>,
    ))
}
