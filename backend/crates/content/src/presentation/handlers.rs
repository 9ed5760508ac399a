//! HTTP Handlers

use std::sync::Arc;

use auth::{AuthStatus, Capability};
use axum::Json;
use axum::extract::{Path, State};
use kernel::id::{BlogPostId, PortfolioItemId, ServiceId};
use platform::revalidate::Revalidator;
use serde_json::Value;

use crate::application::{
    BlogUseCase, ContentConfig, PortfolioUseCase, ServiceUseCase, StatsUseCase,
};
use crate::domain::repository::ContentStore;
use crate::error::ContentResult;
use crate::presentation::dto::{
    BlogPostRequest, FormattedPost, FormattedPostDetail, MessageResponse, PortfolioRequest,
    ServiceRequest, created, keyed,
};

/// Shared state for content handlers
pub struct ContentAppState<R: ContentStore> {
    pub repo: Arc<R>,
    pub config: Arc<ContentConfig>,
    pub revalidator: Revalidator,
}

impl<R: ContentStore> Clone for ContentAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            revalidator: self.revalidator.clone(),
        }
    }
}

impl<R: ContentStore> ContentAppState<R> {
    fn blog(&self) -> BlogUseCase<R, R> {
        BlogUseCase::new(self.repo.clone(), self.repo.clone(), self.revalidator.clone())
    }

    fn services(&self) -> ServiceUseCase<R> {
        ServiceUseCase::new(self.repo.clone(), self.revalidator.clone())
    }

    fn portfolio(&self) -> PortfolioUseCase<R> {
        PortfolioUseCase::new(self.repo.clone(), self.revalidator.clone())
    }
}

// ============================================================================
// Blog
// ============================================================================

/// GET /api/blog
pub async fn list_posts<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
) -> ContentResult<Json<Value>> {
    let posts: Vec<FormattedPost> = state
        .blog()
        .list()
        .await?
        .into_iter()
        .map(|post| FormattedPost::new(post, &state.config))
        .collect();
    Ok(Json(keyed("posts", posts)?))
}

/// GET /api/blog/{slug}
pub async fn get_post_by_slug<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    Path(slug): Path<String>,
) -> ContentResult<Json<Value>> {
    let post = state.blog().get_by_slug(&slug).await?;
    Ok(Json(keyed(
        "post",
        FormattedPostDetail::new(post, &state.config),
    )?))
}

/// GET /api/blog/categories
pub async fn post_categories<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
) -> ContentResult<Json<Value>> {
    Ok(Json(keyed("categories", state.blog().categories().await?)?))
}

/// POST /api/blog
pub async fn create_post<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Json(req): Json<BlogPostRequest>,
) -> ContentResult<Json<Value>> {
    let actor = status.require(Capability::ManageContent)?;
    let id = state.blog().create(req.into_input(Some(actor.id))).await?;
    Ok(Json(created(
        "Blog post created successfully",
        "postId",
        id.get(),
    )))
}

/// GET /api/admin/blog
pub async fn admin_list_posts<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
) -> ContentResult<Json<Value>> {
    Ok(Json(keyed("posts", state.blog().list().await?)?))
}

/// GET /api/admin/blog/{id}
pub async fn get_post<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> ContentResult<Json<Value>> {
    let post = state.blog().get(BlogPostId::new(id)).await?;
    Ok(Json(keyed("post", post)?))
}

/// PUT /api/admin/blog/{id}
pub async fn update_post<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Path(id): Path<i64>,
    Json(req): Json<BlogPostRequest>,
) -> ContentResult<Json<MessageResponse>> {
    status.require(Capability::ManageContent)?;
    state
        .blog()
        .update(BlogPostId::new(id), req.into_input(None))
        .await?;
    Ok(Json(MessageResponse::ok("Blog post updated successfully")))
}

/// DELETE /api/admin/blog/{id}
pub async fn delete_post<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Path(id): Path<i64>,
) -> ContentResult<Json<MessageResponse>> {
    status.require(Capability::ManageContent)?;
    state.blog().delete(BlogPostId::new(id)).await?;
    Ok(Json(MessageResponse::ok("Blog post deleted successfully")))
}

// ============================================================================
// Services
// ============================================================================

/// GET /api/services
pub async fn list_services<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
) -> ContentResult<Json<Value>> {
    Ok(Json(keyed("services", state.services().list().await?)?))
}

/// GET /api/services/{slug}
pub async fn get_service_by_slug<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    Path(slug): Path<String>,
) -> ContentResult<Json<Value>> {
    let service = state.services().get_by_slug(&slug).await?;
    Ok(Json(keyed("service", service)?))
}

/// POST /api/services
pub async fn create_service<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Json(req): Json<ServiceRequest>,
) -> ContentResult<Json<Value>> {
    status.require(Capability::ManageContent)?;
    let id = state.services().create(req.into()).await?;
    Ok(Json(created(
        "Service created successfully",
        "serviceId",
        id.get(),
    )))
}

/// GET /api/admin/services/{id}
pub async fn get_service<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> ContentResult<Json<Value>> {
    let service = state.services().get(ServiceId::new(id)).await?;
    Ok(Json(keyed("service", service)?))
}

/// PUT /api/admin/services/{id}
pub async fn update_service<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Path(id): Path<i64>,
    Json(req): Json<ServiceRequest>,
) -> ContentResult<Json<MessageResponse>> {
    status.require(Capability::ManageContent)?;
    state
        .services()
        .update(ServiceId::new(id), req.into())
        .await?;
    Ok(Json(MessageResponse::ok("Service updated successfully")))
}

/// DELETE /api/admin/services/{id}
pub async fn delete_service<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Path(id): Path<i64>,
) -> ContentResult<Json<MessageResponse>> {
    status.require(Capability::ManageContent)?;
    state.services().delete(ServiceId::new(id)).await?;
    Ok(Json(MessageResponse::ok("Service deleted successfully")))
}

// ============================================================================
// Portfolio
// ============================================================================

/// GET /api/portfolio
pub async fn list_items<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
) -> ContentResult<Json<Value>> {
    Ok(Json(keyed("items", state.portfolio().list().await?)?))
}

/// GET /api/portfolio/{id}
pub async fn get_item<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> ContentResult<Json<Value>> {
    let item = state.portfolio().get(PortfolioItemId::new(id)).await?;
    Ok(Json(keyed("item", item)?))
}

/// GET /api/portfolio/categories
pub async fn item_categories<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
) -> ContentResult<Json<Value>> {
    Ok(Json(keyed(
        "categories",
        state.portfolio().categories().await?,
    )?))
}

/// POST /api/portfolio
pub async fn create_item<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Json(req): Json<PortfolioRequest>,
) -> ContentResult<Json<Value>> {
    status.require(Capability::ManageContent)?;
    let id = state.portfolio().create(req.into()).await?;
    Ok(Json(created(
        "Portfolio item created successfully",
        "itemId",
        id.get(),
    )))
}

/// PUT /api/admin/portfolio/{id}
pub async fn update_item<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Path(id): Path<i64>,
    Json(req): Json<PortfolioRequest>,
) -> ContentResult<Json<MessageResponse>> {
    status.require(Capability::ManageContent)?;
    state
        .portfolio()
        .update(PortfolioItemId::new(id), req.into())
        .await?;
    Ok(Json(MessageResponse::ok(
        "Portfolio item updated successfully",
    )))
}

/// DELETE /api/admin/portfolio/{id}
pub async fn delete_item<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
    status: AuthStatus,
    Path(id): Path<i64>,
) -> ContentResult<Json<MessageResponse>> {
    status.require(Capability::ManageContent)?;
    state.portfolio().delete(PortfolioItemId::new(id)).await?;
    Ok(Json(MessageResponse::ok(
        "Portfolio item deleted successfully",
    )))
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /api/admin/stats
pub async fn stats<R: ContentStore>(
    State(state): State<ContentAppState<R>>,
) -> ContentResult<Json<Value>> {
    let stats = StatsUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(keyed("stats", stats)?))
}
