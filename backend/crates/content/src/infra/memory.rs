//! In-memory repository
//!
//! Stores the same rows as the MySQL tables, list columns JSON-encoded,
//! with the unique slug indexes and the author join emulated.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::{BlogPostId, PortfolioItemId, ServiceId, UserId};
use tokio::sync::Mutex;

use crate::domain::entity::{
    BlogPost, ContentStats, NewBlogPost, NewPortfolioItem, NewService, PortfolioItem, Service,
};
use crate::domain::repository::{
    AuthorDirectory, BlogPostRepository, PortfolioRepository, ServiceRepository, StatsRepository,
};
use crate::error::{ContentError, ContentResult};
use crate::infra::rows::{BlogPostRow, PortfolioLists, PortfolioRow, ServiceLists, ServiceRow};

struct Author {
    id: UserId,
    name: String,
    is_admin: bool,
}

#[derive(Default)]
struct State {
    authors: Vec<Author>,
    posts: Vec<BlogPostRow>,
    services: Vec<ServiceRow>,
    items: Vec<PortfolioRow>,
    next_author_id: i64,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn post(&self, row: &BlogPostRow) -> BlogPost {
        let mut row = row.clone();
        row.author_name = row
            .author_id
            .and_then(|id| self.authors.iter().find(|a| a.id.get() == id))
            .map(|a| a.name.clone());
        row.into_post()
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[derive(Clone, Default)]
pub struct MemoryContentRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user that posts can be attributed to
    pub async fn seed_author(&self, name: &str, is_admin: bool) -> UserId {
        let mut state = self.state.lock().await;
        state.next_author_id += 1;
        let id = UserId::new(state.next_author_id);
        state.authors.push(Author {
            id,
            name: name.to_string(),
            is_admin,
        });
        id
    }

    /// Emulates `ON DELETE SET NULL` on `blog_posts.author_id`
    pub async fn remove_author(&self, id: UserId) {
        let mut state = self.state.lock().await;
        state.authors.retain(|a| a.id != id);
        for post in state.posts.iter_mut() {
            if post.author_id == Some(id.get()) {
                post.author_id = None;
            }
        }
    }
}

// ============================================================================
// Blog Post Repository Implementation
// ============================================================================

impl BlogPostRepository for MemoryContentRepository {
    async fn list_posts(&self) -> ContentResult<Vec<BlogPost>> {
        let state = self.state.lock().await;
        let mut rows = state.posts.clone();
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows.iter().map(|r| state.post(r)).collect())
    }

    async fn find_post(&self, id: BlogPostId) -> ContentResult<Option<BlogPost>> {
        let state = self.state.lock().await;
        Ok(state
            .posts
            .iter()
            .find(|r| r.id == id.get())
            .map(|r| state.post(r)))
    }

    async fn find_post_by_slug(&self, slug: &str) -> ContentResult<Option<BlogPost>> {
        let state = self.state.lock().await;
        Ok(state
            .posts
            .iter()
            .find(|r| r.slug == slug)
            .map(|r| state.post(r)))
    }

    async fn create_post(&self, post: &NewBlogPost) -> ContentResult<BlogPostId> {
        let mut state = self.state.lock().await;
        if state.posts.iter().any(|r| r.slug == post.slug) {
            return Err(ContentError::SlugTaken);
        }

        let id = state.next_id();
        let now = Utc::now();
        state.posts.push(BlogPostRow {
            id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            author_id: Some(post.author_id.get()),
            author_name: None,
            category: post.category.clone(),
            image_url: post.image_url.clone(),
            status: post.status.code().to_string(),
            published_at: post.published_at,
            created_at: now,
            updated_at: now,
        });
        Ok(BlogPostId::new(id))
    }

    async fn update_post(&self, id: BlogPostId, post: &NewBlogPost) -> ContentResult<bool> {
        let mut state = self.state.lock().await;
        if state
            .posts
            .iter()
            .any(|r| r.slug == post.slug && r.id != id.get())
        {
            return Err(ContentError::SlugTaken);
        }

        let Some(row) = state.posts.iter_mut().find(|r| r.id == id.get()) else {
            return Ok(false);
        };
        row.title = post.title.clone();
        row.slug = post.slug.clone();
        row.excerpt = post.excerpt.clone();
        row.content = post.content.clone();
        row.author_id = Some(post.author_id.get());
        row.category = post.category.clone();
        row.image_url = post.image_url.clone();
        row.status = post.status.code().to_string();
        row.published_at = post.published_at;
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_post(&self, id: BlogPostId) -> ContentResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.posts.len();
        state.posts.retain(|r| r.id != id.get());
        Ok(state.posts.len() < before)
    }

    async fn post_categories(&self) -> ContentResult<Vec<String>> {
        let state = self.state.lock().await;
        let categories: BTreeSet<String> =
            state.posts.iter().filter_map(|r| r.category.clone()).collect();
        Ok(categories.into_iter().collect())
    }
}

// ============================================================================
// Service Repository Implementation
// ============================================================================

impl ServiceRepository for MemoryContentRepository {
    async fn list_services(&self) -> ContentResult<Vec<Service>> {
        let state = self.state.lock().await;
        let mut rows = state.services.clone();
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows.into_iter().map(ServiceRow::into_service).collect())
    }

    async fn find_service(&self, id: ServiceId) -> ContentResult<Option<Service>> {
        let state = self.state.lock().await;
        Ok(state
            .services
            .iter()
            .find(|r| r.id == id.get())
            .cloned()
            .map(ServiceRow::into_service))
    }

    async fn find_service_by_slug(&self, slug: &str) -> ContentResult<Option<Service>> {
        let state = self.state.lock().await;
        Ok(state
            .services
            .iter()
            .find(|r| r.slug == slug)
            .cloned()
            .map(ServiceRow::into_service))
    }

    async fn create_service(&self, service: &NewService) -> ContentResult<ServiceId> {
        let lists = ServiceLists::encode(service)?;
        let mut state = self.state.lock().await;
        if state.services.iter().any(|r| r.slug == service.slug) {
            return Err(ContentError::SlugTaken);
        }

        let id = state.next_id();
        let now = Utc::now();
        state.services.push(ServiceRow {
            id,
            title: service.title.clone(),
            slug: service.slug.clone(),
            description: service.description.clone(),
            icon: service.icon.clone(),
            features: Some(lists.features),
            use_cases: Some(lists.use_cases),
            created_at: now,
            updated_at: now,
        });
        Ok(ServiceId::new(id))
    }

    async fn update_service(&self, id: ServiceId, service: &NewService) -> ContentResult<bool> {
        let lists = ServiceLists::encode(service)?;
        let mut state = self.state.lock().await;
        if state
            .services
            .iter()
            .any(|r| r.slug == service.slug && r.id != id.get())
        {
            return Err(ContentError::SlugTaken);
        }

        let Some(row) = state.services.iter_mut().find(|r| r.id == id.get()) else {
            return Ok(false);
        };
        row.title = service.title.clone();
        row.slug = service.slug.clone();
        row.description = service.description.clone();
        row.icon = service.icon.clone();
        row.features = Some(lists.features);
        row.use_cases = Some(lists.use_cases);
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_service(&self, id: ServiceId) -> ContentResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.services.len();
        state.services.retain(|r| r.id != id.get());
        Ok(state.services.len() < before)
    }
}

// ============================================================================
// Portfolio Repository Implementation
// ============================================================================

impl PortfolioRepository for MemoryContentRepository {
    async fn list_items(&self) -> ContentResult<Vec<PortfolioItem>> {
        let state = self.state.lock().await;
        let mut rows = state.items.clone();
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows.into_iter().map(PortfolioRow::into_item).collect())
    }

    async fn find_item(&self, id: PortfolioItemId) -> ContentResult<Option<PortfolioItem>> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .iter()
            .find(|r| r.id == id.get())
            .cloned()
            .map(PortfolioRow::into_item))
    }

    async fn create_item(&self, item: &NewPortfolioItem) -> ContentResult<PortfolioItemId> {
        let lists = PortfolioLists::encode(item)?;
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let now = Utc::now();
        state.items.push(PortfolioRow {
            id,
            title: item.title.clone(),
            description: item.description.clone(),
            full_description: item.full_description.clone(),
            client: item.client.clone(),
            image_url: item.image_url.clone(),
            tags: Some(lists.tags),
            category: item.category.clone(),
            results: Some(lists.results),
            created_at: now,
            updated_at: now,
        });
        Ok(PortfolioItemId::new(id))
    }

    async fn update_item(
        &self,
        id: PortfolioItemId,
        item: &NewPortfolioItem,
    ) -> ContentResult<bool> {
        let lists = PortfolioLists::encode(item)?;
        let mut state = self.state.lock().await;
        let Some(row) = state.items.iter_mut().find(|r| r.id == id.get()) else {
            return Ok(false);
        };
        row.title = item.title.clone();
        row.description = item.description.clone();
        row.full_description = item.full_description.clone();
        row.client = item.client.clone();
        row.image_url = item.image_url.clone();
        row.tags = Some(lists.tags);
        row.category = item.category.clone();
        row.results = Some(lists.results);
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_item(&self, id: PortfolioItemId) -> ContentResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.items.len();
        state.items.retain(|r| r.id != id.get());
        Ok(state.items.len() < before)
    }

    async fn item_categories(&self) -> ContentResult<Vec<String>> {
        let state = self.state.lock().await;
        let categories: BTreeSet<String> =
            state.items.iter().filter_map(|r| r.category.clone()).collect();
        Ok(categories.into_iter().collect())
    }
}

// ============================================================================
// Author Directory / Stats
// ============================================================================

impl AuthorDirectory for MemoryContentRepository {
    async fn author_exists(&self, id: UserId) -> ContentResult<bool> {
        let state = self.state.lock().await;
        Ok(state.authors.iter().any(|a| a.id == id))
    }

    async fn first_admin(&self) -> ContentResult<Option<UserId>> {
        let state = self.state.lock().await;
        Ok(state.authors.iter().find(|a| a.is_admin).map(|a| a.id))
    }

    async fn any_user(&self) -> ContentResult<Option<UserId>> {
        let state = self.state.lock().await;
        Ok(state.authors.first().map(|a| a.id))
    }
}

impl StatsRepository for MemoryContentRepository {
    async fn stats(&self) -> ContentResult<ContentStats> {
        let state = self.state.lock().await;
        Ok(ContentStats {
            users: state.authors.len() as u64,
            blog_posts: state.posts.len() as u64,
            services: state.services.len() as u64,
            portfolio_items: state.items.len() as u64,
        })
    }
}
