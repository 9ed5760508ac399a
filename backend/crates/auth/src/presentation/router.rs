//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::domain::repository::{AuthStore, OAuthProvider};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_admin;

/// `/api/auth/*` plus the admin user routes. Expects `AuthStatus` from
/// [`attach_current_user`](crate::presentation::middleware::attach_current_user).
pub fn auth_router<R, P>(state: AuthAppState<R, P>) -> Router
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    let public = Router::new()
        .route("/api/auth/register", post(handlers::register::<R, P>))
        .route("/api/auth/login", post(handlers::login::<R, P>))
        .route("/api/auth/logout", post(handlers::logout::<R, P>))
        .route("/api/auth/check", get(handlers::check::<R, P>))
        .route("/api/auth/github", post(handlers::github_login::<R, P>))
        .route("/api/auth/profile", put(handlers::update_profile::<R, P>));

    let admin = Router::new()
        .route(
            "/api/admin/users",
            get(handlers::list_users::<R, P>).post(handlers::create_user::<R, P>),
        )
        .route(
            "/api/admin/users/{id}",
            get(handlers::get_user::<R, P>)
                .put(handlers::update_user::<R, P>)
                .delete(handlers::delete_user::<R, P>),
        )
        .route(
            "/api/admin/users/{id}/activity",
            get(handlers::user_activity::<R, P>),
        )
        .route_layer(middleware::from_fn(require_admin));

    public.merge(admin).with_state(state)
}

/// `GET /api/admin/create`. Mount outside production only.
pub fn dev_router<R, P>(state: AuthAppState<R, P>) -> Router
where
    R: AuthStore,
    P: OAuthProvider + Sync + 'static,
{
    Router::new()
        .route("/api/admin/create", get(handlers::create_dev_admin::<R, P>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use platform::revalidate::Revalidator;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::application::config::AuthConfig;
    use crate::domain::entity::OAuthIdentity;
    use crate::domain::value_object::UserRole;
    use crate::error::{AuthError, AuthResult};
    use crate::infra::memory::MemoryAuthRepository;
    use crate::presentation::middleware::{AuthMiddlewareState, attach_current_user};

    struct NoGithub;

    impl OAuthProvider for NoGithub {
        fn name(&self) -> &'static str {
            "github"
        }

        async fn exchange_code(&self, _code: &str) -> AuthResult<String> {
            Err(AuthError::OAuthUnavailable("GitHub login is not configured".into()))
        }

        async fn fetch_identity(&self, _access_token: &str) -> AuthResult<OAuthIdentity> {
            Err(AuthError::OAuthUnavailable("GitHub login is not configured".into()))
        }
    }

    fn app(repo: &MemoryAuthRepository) -> Router {
        let repo = Arc::new(repo.clone());
        let config = Arc::new(AuthConfig::development());
        let state = AuthAppState {
            repo: repo.clone(),
            oauth: Arc::new(NoGithub),
            config: config.clone(),
            revalidator: Revalidator::default(),
        };

        attach_current_user(
            auth_router(state.clone()).merge(dev_router(state)),
            AuthMiddlewareState { repo, config },
        )
    }

    fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `session_token=...` pair from a Set-Cookie header
    fn cookie_pair(res: &axum::response::Response) -> String {
        let raw = res
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    async fn login_cookie(app: &Router, email: &str, password: &str) -> String {
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({ "email": email, "password": password }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        cookie_pair(&res)
    }

    #[tokio::test]
    async fn test_register_then_check() {
        let repo = MemoryAuthRepository::new();
        let app = app(&repo);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                json!({
                    "name": "Ana",
                    "email": "ana@x.com",
                    "password": "secret1",
                    "confirmPassword": "secret1",
                    "agreeTerms": true
                }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(!set_cookie.contains("Max-Age"));
        let cookie = cookie_pair(&res);

        let body = body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["role"], "user");

        let res = app
            .clone()
            .oneshot(get_request("/api/auth/check", Some(&cookie)))
            .await
            .unwrap();
        let body = body_json(res).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["email"], "ana@x.com");
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_check_without_cookie() {
        let repo = MemoryAuthRepository::new();
        let res = app(&repo)
            .oneshot(get_request("/api/auth/check", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn test_login_failure_envelope() {
        let repo = MemoryAuthRepository::new();
        repo.seed_user("Ana", "ana@x.com", "secret1", UserRole::User)
            .await
            .unwrap();

        for (email, password) in [("ana@x.com", "wrong"), ("ghost@x.com", "secret1")] {
            let res = app(&repo)
                .oneshot(json_request(
                    "POST",
                    "/api/auth/login",
                    json!({ "email": email, "password": password }),
                    None,
                ))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            let body = body_json(res).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_remember_me_sets_max_age() {
        let repo = MemoryAuthRepository::new();
        repo.seed_user("Ana", "ana@x.com", "secret1", UserRole::User)
            .await
            .unwrap();

        let res = app(&repo)
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({ "email": "ana@x.com", "password": "secret1", "rememberMe": true }),
                None,
            ))
            .await
            .unwrap();
        let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("Max-Age=604800"));
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_and_session() {
        let repo = MemoryAuthRepository::new();
        repo.seed_user("Ana", "ana@x.com", "secret1", UserRole::User)
            .await
            .unwrap();
        let app = app(&repo);
        let cookie = login_cookie(&app, "ana@x.com", "secret1").await;

        let res = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/logout", json!({}), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
        assert_eq!(repo.session_count().await, 0);

        // Logging out again is still a success
        let res = app
            .oneshot(json_request("POST", "/api/auth/logout", json!({}), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_routes_are_gated() {
        let repo = MemoryAuthRepository::new();
        repo.seed_user("Ana", "ana@x.com", "secret1", UserRole::Editor)
            .await
            .unwrap();
        repo.seed_user("Root", "root@x.com", "admin123", UserRole::Admin)
            .await
            .unwrap();
        let app = app(&repo);

        let res = app
            .clone()
            .oneshot(get_request("/api/admin/users", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let editor = login_cookie(&app, "ana@x.com", "secret1").await;
        let res = app
            .clone()
            .oneshot(get_request("/api/admin/users", Some(&editor)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(res).await["kind"], "FORBIDDEN");

        let admin = login_cookie(&app, "root@x.com", "admin123").await;
        let res = app
            .clone()
            .oneshot(get_request("/api/admin/users", Some(&admin)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_admin_creates_user_and_reads_activity() {
        let repo = MemoryAuthRepository::new();
        let root = repo
            .seed_user("Root", "root@x.com", "admin123", UserRole::Admin)
            .await
            .unwrap();
        let app = app(&repo);
        let admin = login_cookie(&app, "root@x.com", "admin123").await;

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/users",
                json!({ "name": "Ed", "email": "ed@x.com", "password": "pw", "role": "editor" }),
                Some(&admin),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["data"]["role"], "editor");

        let res = app
            .oneshot(get_request(
                &format!("/api/admin/users/{}/activity?limit=1", root.id),
                Some(&admin),
            ))
            .await
            .unwrap();
        let body = body_json(res).await;
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["action"], "user_create");
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let repo = MemoryAuthRepository::new();
        let res = app(&repo)
            .oneshot(json_request(
                "PUT",
                "/api/auth/profile",
                json!({ "name": "Ana" }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_github_unconfigured_is_unavailable() {
        let repo = MemoryAuthRepository::new();
        let res = app(&repo)
            .oneshot(json_request(
                "POST",
                "/api/auth/github",
                json!({ "code": "abc" }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_dev_admin_endpoint() {
        let repo = MemoryAuthRepository::new();
        let app = app(&repo);

        let first = body_json(
            app.clone()
                .oneshot(get_request("/api/admin/create", None))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(first["message"], "Admin user created successfully");
        assert_eq!(first["user"]["email"], "admin@test.com");

        let second = body_json(
            app.oneshot(get_request("/api/admin/create", None))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(second["message"], "Admin user already exists");
    }
}
