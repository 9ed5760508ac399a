//! Repository Traits
//!
//! Interfaces for data persistence. List-valued fields cross these traits as
//! `Vec<String>`; their JSON column encoding is an infrastructure detail.

use kernel::id::{BlogPostId, PortfolioItemId, ServiceId, UserId};

use crate::domain::entity::{
    BlogPost, ContentStats, NewBlogPost, NewPortfolioItem, NewService, PortfolioItem, Service,
};
use crate::error::ContentResult;

#[trait_variant::make(BlogPostRepository: Send)]
pub trait LocalBlogPostRepository {
    /// Newest first, with author names
    async fn list_posts(&self) -> ContentResult<Vec<BlogPost>>;

    async fn find_post(&self, id: BlogPostId) -> ContentResult<Option<BlogPost>>;

    async fn find_post_by_slug(&self, slug: &str) -> ContentResult<Option<BlogPost>>;

    /// Fails with `ContentError::SlugTaken` on a duplicate slug
    async fn create_post(&self, post: &NewBlogPost) -> ContentResult<BlogPostId>;

    /// Full-row replace. Returns false when no row has this id.
    async fn update_post(&self, id: BlogPostId, post: &NewBlogPost) -> ContentResult<bool>;

    async fn delete_post(&self, id: BlogPostId) -> ContentResult<bool>;

    /// Distinct non-null categories
    async fn post_categories(&self) -> ContentResult<Vec<String>>;
}

#[trait_variant::make(ServiceRepository: Send)]
pub trait LocalServiceRepository {
    async fn list_services(&self) -> ContentResult<Vec<Service>>;

    async fn find_service(&self, id: ServiceId) -> ContentResult<Option<Service>>;

    async fn find_service_by_slug(&self, slug: &str) -> ContentResult<Option<Service>>;

    async fn create_service(&self, service: &NewService) -> ContentResult<ServiceId>;

    async fn update_service(&self, id: ServiceId, service: &NewService) -> ContentResult<bool>;

    async fn delete_service(&self, id: ServiceId) -> ContentResult<bool>;
}

#[trait_variant::make(PortfolioRepository: Send)]
pub trait LocalPortfolioRepository {
    async fn list_items(&self) -> ContentResult<Vec<PortfolioItem>>;

    async fn find_item(&self, id: PortfolioItemId) -> ContentResult<Option<PortfolioItem>>;

    async fn create_item(&self, item: &NewPortfolioItem) -> ContentResult<PortfolioItemId>;

    async fn update_item(&self, id: PortfolioItemId, item: &NewPortfolioItem)
    -> ContentResult<bool>;

    async fn delete_item(&self, id: PortfolioItemId) -> ContentResult<bool>;

    async fn item_categories(&self) -> ContentResult<Vec<String>>;
}

/// Read-only view of `users` for picking a blog post author
#[trait_variant::make(AuthorDirectory: Send)]
pub trait LocalAuthorDirectory {
    async fn author_exists(&self, id: UserId) -> ContentResult<bool>;

    /// Oldest admin account
    async fn first_admin(&self) -> ContentResult<Option<UserId>>;

    /// Oldest account of any role
    async fn any_user(&self) -> ContentResult<Option<UserId>>;
}

#[trait_variant::make(StatsRepository: Send)]
pub trait LocalStatsRepository {
    async fn stats(&self) -> ContentResult<ContentStats>;
}

/// Everything the content HTTP surface needs from storage
pub trait ContentStore:
    BlogPostRepository
    + ServiceRepository
    + PortfolioRepository
    + AuthorDirectory
    + StatsRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> ContentStore for T where
    T: BlogPostRepository
        + ServiceRepository
        + PortfolioRepository
        + AuthorDirectory
        + StatsRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
