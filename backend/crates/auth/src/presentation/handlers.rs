//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::IntoResponse;
use kernel::id::UserId;
use platform::client::ClientInfo;
use platform::revalidate::Revalidator;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentUserUseCase, DevAdminUseCase, GithubLoginUseCase, LoginInput, LoginUseCase,
    LogoutUseCase, ManageUsersUseCase, RegisterInput, RegisterUseCase, UpdateProfileInput,
    UpdateProfileUseCase, UserForm,
};
use crate::domain::authorization::Capability;
use crate::domain::repository::{AuthStore, OAuthProvider};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ActivityQuery, CheckResponse, DataResponse, DevAdminCredentials, DevAdminResponse,
    GithubLoginRequest, LoginRequest, MessageResponse, ProfileRequest, RegisterRequest,
    UserFormRequest, UserResponse,
};
use crate::presentation::middleware::AuthStatus;

/// Shared state for auth handlers
pub struct AuthAppState<R, P>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    pub repo: Arc<R>,
    pub oauth: Arc<P>,
    pub config: Arc<AuthConfig>,
    pub revalidator: Revalidator,
}

impl<R, P> Clone for AuthAppState<R, P>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            oauth: self.oauth.clone(),
            config: self.config.clone(),
            revalidator: self.revalidator.clone(),
        }
    }
}

// ============================================================================
// Register / Login / Logout
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, P>(
    State(state): State<AuthAppState<R, P>>,
    client: ClientInfo,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            agree_terms: req.agree_terms,
            client,
        })
        .await?;

    // Browser-session cookie: no Max-Age
    let cookie = session_cookie(&state.config, &output.session.token, None)?;

    Ok(([(header::SET_COOKIE, cookie)], Json(UserResponse::from(output.user))))
}

/// POST /api/auth/login
pub async fn login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    client: ClientInfo,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
            remember_me: req.remember_me,
            client,
        })
        .await?;

    let max_age = output
        .remember_me
        .then(|| state.config.remember_me_max_age_secs());
    let cookie = session_cookie(&state.config, &output.session.token, max_age)?;

    Ok(([(header::SET_COOKIE, cookie)], Json(UserResponse::from(output.user))))
}

/// POST /api/auth/logout
pub async fn logout<R, P>(
    State(state): State<AuthAppState<R, P>>,
    client: ClientInfo,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = LogoutUseCase::new(state.repo.clone(), state.repo.clone());
    use_case.execute(token.as_deref(), &client).await?;

    let cookie = state
        .config
        .cookie()
        .delete_cookie_header()
        .ok_or_else(|| AuthError::Internal("cookie header could not be encoded".into()))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::ok("Logged out")),
    ))
}

// ============================================================================
// Session Check
// ============================================================================

/// GET /api/auth/check
pub async fn check<R, P>(
    State(state): State<AuthAppState<R, P>>,
    headers: HeaderMap,
) -> AuthResult<Json<CheckResponse>>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let user = match platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name) {
        Some(token) => {
            CurrentUserUseCase::new(state.repo.clone())
                .execute(&token)
                .await?
        }
        None => None,
    };

    Ok(Json(CheckResponse {
        authenticated: user.is_some(),
        user: user.map(Into::into),
    }))
}

// ============================================================================
// GitHub OAuth
// ============================================================================

/// POST /api/auth/github
pub async fn github_login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    client: ClientInfo,
    Json(req): Json<GithubLoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let use_case =
        GithubLoginUseCase::new(state.repo.clone(), state.oauth.clone(), state.config.clone());

    let output = use_case.execute(&req.code, &client).await?;

    let cookie = session_cookie(
        &state.config,
        &output.session.token,
        Some(state.config.remember_me_max_age_secs()),
    )?;

    Ok(([(header::SET_COOKIE, cookie)], Json(UserResponse::from(output.user))))
}

// ============================================================================
// Profile (requires authentication)
// ============================================================================

/// PUT /api/auth/profile
pub async fn update_profile<R, P>(
    State(state): State<AuthAppState<R, P>>,
    status: AuthStatus,
    client: ClientInfo,
    Json(req): Json<ProfileRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let user = status.user.ok_or(AuthError::Unauthenticated)?;

    let use_case =
        UpdateProfileUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let profile = use_case
        .execute(
            user.id,
            UpdateProfileInput {
                name: req.name,
                profile_image: req.profile_image,
                bio: req.bio,
                new_password: req.new_password,
            },
            &client,
        )
        .await?;

    Ok(Json(UserResponse::from(profile)))
}

// ============================================================================
// User Administration (admin only)
// ============================================================================

fn manage_users<R, P>(state: &AuthAppState<R, P>) -> ManageUsersUseCase<R, R>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    ManageUsersUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
        state.revalidator.clone(),
    )
}

impl From<UserFormRequest> for UserForm {
    fn from(req: UserFormRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
            profile_image: req.profile_image,
            bio: req.bio,
        }
    }
}

/// GET /api/admin/users
pub async fn list_users<R, P>(
    State(state): State<AuthAppState<R, P>>,
    status: AuthStatus,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    status.require(Capability::ManageUsers)?;
    let users = manage_users(&state).list().await?;
    Ok(Json(DataResponse::ok(users)))
}

/// GET /api/admin/users/{id}
pub async fn get_user<R, P>(
    State(state): State<AuthAppState<R, P>>,
    status: AuthStatus,
    Path(id): Path<i64>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    status.require(Capability::ManageUsers)?;
    let user = manage_users(&state).get(UserId::new(id)).await?;
    Ok(Json(DataResponse::ok(user)))
}

/// POST /api/admin/users
pub async fn create_user<R, P>(
    State(state): State<AuthAppState<R, P>>,
    status: AuthStatus,
    client: ClientInfo,
    Json(req): Json<UserFormRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let actor = status.require(Capability::ManageUsers)?;
    let user = manage_users(&state).create(actor, &client, req.into()).await?;
    Ok(Json(DataResponse::ok(user)))
}

/// PUT /api/admin/users/{id}
pub async fn update_user<R, P>(
    State(state): State<AuthAppState<R, P>>,
    status: AuthStatus,
    client: ClientInfo,
    Path(id): Path<i64>,
    Json(req): Json<UserFormRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let actor = status.require(Capability::ManageUsers)?;
    let user = manage_users(&state)
        .update(actor, &client, UserId::new(id), req.into())
        .await?;
    Ok(Json(DataResponse::ok(user)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user<R, P>(
    State(state): State<AuthAppState<R, P>>,
    status: AuthStatus,
    client: ClientInfo,
    Path(id): Path<i64>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let actor = status.require(Capability::ManageUsers)?;
    manage_users(&state).delete(actor, &client, UserId::new(id)).await?;
    Ok(Json(MessageResponse::ok("User deleted")))
}

/// GET /api/admin/users/{id}/activity
pub async fn user_activity<R, P>(
    State(state): State<AuthAppState<R, P>>,
    status: AuthStatus,
    Path(id): Path<i64>,
    Query(query): Query<ActivityQuery>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    status.require(Capability::ManageUsers)?;
    let entries = manage_users(&state)
        .activity(UserId::new(id), query.limit)
        .await?;
    Ok(Json(DataResponse::ok(entries)))
}

// ============================================================================
// Development Admin
// ============================================================================

/// GET /api/admin/create
pub async fn create_dev_admin<R, P>(
    State(state): State<AuthAppState<R, P>>,
) -> AuthResult<Json<DevAdminResponse>>
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let output = DevAdminUseCase::new(state.repo.clone(), state.config.clone())
        .execute()
        .await?;

    Ok(Json(DevAdminResponse {
        message: if output.created {
            "Admin user created successfully"
        } else {
            "Admin user already exists"
        },
        user: DevAdminCredentials {
            email: output.email,
            password: output.password,
            hash: output.hash,
        },
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_cookie(
    config: &AuthConfig,
    token: &str,
    max_age_secs: Option<i64>,
) -> AuthResult<HeaderValue> {
    config
        .cookie()
        .set_cookie_header(token, max_age_secs)
        .ok_or_else(|| AuthError::Internal("cookie header could not be encoded".into()))
}
