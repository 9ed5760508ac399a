//! Blog Use Case
//!
//! CRUD over blog posts. Writes pick a valid author and keep the first
//! publish date; every mutation revalidates the admin list, the public
//! index and the post page.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{BlogPostId, UserId};
use platform::revalidate::Revalidator;

use crate::application::support::{non_empty, require};
use crate::domain::entity::{BlogPost, BlogPostInput, NewBlogPost, next_published_at};
use crate::domain::repository::{AuthorDirectory, BlogPostRepository};
use crate::error::{ContentError, ContentResult};

const NOT_FOUND: &str = "Blog post not found";

pub struct BlogUseCase<B, A>
where
    B: BlogPostRepository,
    A: AuthorDirectory,
{
    posts: Arc<B>,
    authors: Arc<A>,
    revalidator: Revalidator,
}

impl<B, A> BlogUseCase<B, A>
where
    B: BlogPostRepository,
    A: AuthorDirectory,
{
    pub fn new(posts: Arc<B>, authors: Arc<A>, revalidator: Revalidator) -> Self {
        Self {
            posts,
            authors,
            revalidator,
        }
    }

    pub async fn list(&self) -> ContentResult<Vec<BlogPost>> {
        self.posts.list_posts().await
    }

    pub async fn get(&self, id: BlogPostId) -> ContentResult<BlogPost> {
        self.posts
            .find_post(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn get_by_slug(&self, slug: &str) -> ContentResult<BlogPost> {
        self.posts
            .find_post_by_slug(slug)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn categories(&self) -> ContentResult<Vec<String>> {
        self.posts.post_categories().await
    }

    pub async fn create(&self, input: BlogPostInput) -> ContentResult<BlogPostId> {
        let record = self.record(input, None).await?;
        let id = self.posts.create_post(&record).await?;

        tracing::info!(post_id = %id, slug = %record.slug, status = record.status.code(), "Blog post created");
        self.revalidate(&record.slug);
        Ok(id)
    }

    pub async fn update(&self, id: BlogPostId, input: BlogPostInput) -> ContentResult<()> {
        let current = self.get(id).await?;
        // Without an explicit author the post keeps its current one
        let input = BlogPostInput {
            author_id: input.author_id.or(current.author_id),
            ..input
        };
        let record = self.record(input, current.published_at).await?;

        if !self.posts.update_post(id, &record).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }

        tracing::info!(post_id = %id, slug = %record.slug, status = record.status.code(), "Blog post updated");
        if current.slug != record.slug {
            self.revalidator.revalidate(format!("/blog/{}", current.slug));
        }
        self.revalidate(&record.slug);
        Ok(())
    }

    pub async fn delete(&self, id: BlogPostId) -> ContentResult<()> {
        let current = self.get(id).await?;
        if !self.posts.delete_post(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }

        tracing::info!(post_id = %id, slug = %current.slug, "Blog post deleted");
        self.revalidate(&current.slug);
        Ok(())
    }

    async fn record(
        &self,
        input: BlogPostInput,
        previous_published_at: Option<chrono::DateTime<Utc>>,
    ) -> ContentResult<NewBlogPost> {
        require(&[&input.title, &input.slug], "Title and slug are required")?;

        let author_id = self.resolve_author(input.author_id).await?;

        Ok(NewBlogPost {
            title: input.title.trim().to_string(),
            slug: input.slug.trim().to_string(),
            excerpt: non_empty(input.excerpt),
            content: input.content,
            author_id,
            category: non_empty(input.category),
            image_url: non_empty(input.image_url),
            status: input.status,
            published_at: next_published_at(input.status, previous_published_at, Utc::now()),
        })
    }

    /// The requested author if it exists, else the first admin, else any user
    async fn resolve_author(&self, requested: Option<UserId>) -> ContentResult<UserId> {
        if let Some(id) = requested {
            if self.authors.author_exists(id).await? {
                return Ok(id);
            }
            tracing::warn!(author_id = %id, "Requested author does not exist, falling back");
        }

        if let Some(id) = self.authors.first_admin().await? {
            return Ok(id);
        }

        self.authors
            .any_user()
            .await?
            .ok_or(ContentError::NoValidAuthor)
    }

    fn revalidate(&self, slug: &str) {
        self.revalidator.revalidate_all([
            "/admin/blog".to_string(),
            "/blog".to_string(),
            format!("/blog/{slug}"),
        ]);
    }
}
