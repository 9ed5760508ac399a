//! Content Router

use auth::presentation::require_admin;
use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::domain::repository::ContentStore;
use crate::presentation::handlers::{self, ContentAppState};

/// Public blog, service and portfolio routes plus their admin
/// counterparts. Expects `AuthStatus` from `auth::attach_current_user`.
pub fn content_router<R: ContentStore>(state: ContentAppState<R>) -> Router {
    let public = Router::new()
        .route(
            "/api/blog",
            get(handlers::list_posts::<R>).post(handlers::create_post::<R>),
        )
        .route("/api/blog/categories", get(handlers::post_categories::<R>))
        .route("/api/blog/{slug}", get(handlers::get_post_by_slug::<R>))
        .route(
            "/api/services",
            get(handlers::list_services::<R>).post(handlers::create_service::<R>),
        )
        .route(
            "/api/services/{slug}",
            get(handlers::get_service_by_slug::<R>),
        )
        .route(
            "/api/portfolio",
            get(handlers::list_items::<R>).post(handlers::create_item::<R>),
        )
        .route(
            "/api/portfolio/categories",
            get(handlers::item_categories::<R>),
        )
        .route("/api/portfolio/{id}", get(handlers::get_item::<R>));

    let admin = Router::new()
        .route("/api/admin/stats", get(handlers::stats::<R>))
        .route("/api/admin/blog", get(handlers::admin_list_posts::<R>))
        .route(
            "/api/admin/blog/{id}",
            get(handlers::get_post::<R>)
                .put(handlers::update_post::<R>)
                .delete(handlers::delete_post::<R>),
        )
        .route(
            "/api/admin/services/{id}",
            get(handlers::get_service::<R>)
                .put(handlers::update_service::<R>)
                .delete(handlers::delete_service::<R>),
        )
        .route(
            "/api/admin/portfolio/{id}",
            put(handlers::update_item::<R>)
                .delete(handlers::delete_item::<R>),
        )
        .route_layer(middleware::from_fn(require_admin));

    public.merge(admin).with_state(state)
}
