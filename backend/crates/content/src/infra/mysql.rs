//! MySQL Repository Implementations

use kernel::error::conversions::is_unique_violation;
use kernel::id::{BlogPostId, PortfolioItemId, ServiceId, UserId};
use sqlx::MySqlPool;

use crate::domain::entity::{
    BlogPost, ContentStats, NewBlogPost, NewPortfolioItem, NewService, PortfolioItem, Service,
};
use crate::domain::repository::{
    AuthorDirectory, BlogPostRepository, PortfolioRepository, ServiceRepository, StatsRepository,
};
use crate::error::{ContentError, ContentResult};
use crate::infra::rows::{BlogPostRow, PortfolioLists, PortfolioRow, ServiceLists, ServiceRow};

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.slug, p.excerpt, p.content, p.author_id,
           u.name AS author_name, p.category, p.image_url, p.status,
           p.published_at, p.created_at, p.updated_at
    FROM blog_posts p
    LEFT JOIN users u ON u.id = p.author_id
"#;

// JSON columns are cast so they decode as text.
const SERVICE_SELECT: &str = r#"
    SELECT id, title, slug, description, icon,
           CAST(features AS CHAR) AS features, CAST(use_cases AS CHAR) AS use_cases,
           created_at, updated_at
    FROM services
"#;

const PORTFOLIO_SELECT: &str = r#"
    SELECT id, title, description, full_description, client, image_url,
           CAST(tags AS CHAR) AS tags, category, CAST(results AS CHAR) AS results,
           created_at, updated_at
    FROM portfolio_items
"#;

/// MySQL-backed content repository
#[derive(Clone)]
pub struct MySqlContentRepository {
    pool: MySqlPool,
}

impl MySqlContentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// MySQL reports zero affected rows when an UPDATE changes nothing, so
    /// a zero count alone does not mean the row is missing.
    async fn row_exists(&self, table: &'static str, id: i64) -> ContentResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn updated(&self, table: &'static str, id: i64, affected: u64) -> ContentResult<bool> {
        if affected > 0 {
            return Ok(true);
        }
        self.row_exists(table, id).await
    }
}

fn map_slug_error(err: sqlx::Error) -> ContentError {
    if is_unique_violation(&err) {
        ContentError::SlugTaken
    } else {
        ContentError::Database(err)
    }
}

// ============================================================================
// Blog Post Repository Implementation
// ============================================================================

impl BlogPostRepository for MySqlContentRepository {
    async fn list_posts(&self) -> ContentResult<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, BlogPostRow>(&format!(
            "{POST_SELECT} ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BlogPostRow::into_post).collect())
    }

    async fn find_post(&self, id: BlogPostId) -> ContentResult<Option<BlogPost>> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!("{POST_SELECT} WHERE p.id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BlogPostRow::into_post))
    }

    async fn find_post_by_slug(&self, slug: &str) -> ContentResult<Option<BlogPost>> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!("{POST_SELECT} WHERE p.slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BlogPostRow::into_post))
    }

    async fn create_post(&self, post: &NewBlogPost) -> ContentResult<BlogPostId> {
        let result = sqlx::query(
            r#"
            INSERT INTO blog_posts
                (title, slug, excerpt, content, author_id, category, image_url, status, published_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.author_id.get())
        .bind(&post.category)
        .bind(&post.image_url)
        .bind(post.status.code())
        .bind(post.published_at)
        .execute(&self.pool)
        .await
        .map_err(map_slug_error)?;

        Ok(BlogPostId::new(result.last_insert_id() as i64))
    }

    async fn update_post(&self, id: BlogPostId, post: &NewBlogPost) -> ContentResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = ?, slug = ?, excerpt = ?, content = ?, author_id = ?,
                category = ?, image_url = ?, status = ?, published_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.author_id.get())
        .bind(&post.category)
        .bind(&post.image_url)
        .bind(post.status.code())
        .bind(post.published_at)
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(map_slug_error)?;

        self.updated("blog_posts", id.get(), result.rows_affected())
            .await
    }

    async fn delete_post(&self, id: BlogPostId) -> ContentResult<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn post_categories(&self) -> ContentResult<Vec<String>> {
        let categories = sqlx::query_scalar(
            "SELECT DISTINCT category FROM blog_posts WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}

// ============================================================================
// Service Repository Implementation
// ============================================================================

impl ServiceRepository for MySqlContentRepository {
    async fn list_services(&self) -> ContentResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            "{SERVICE_SELECT} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ServiceRow::into_service).collect())
    }

    async fn find_service(&self, id: ServiceId) -> ContentResult<Option<Service>> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!("{SERVICE_SELECT} WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ServiceRow::into_service))
    }

    async fn find_service_by_slug(&self, slug: &str) -> ContentResult<Option<Service>> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!("{SERVICE_SELECT} WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ServiceRow::into_service))
    }

    async fn create_service(&self, service: &NewService) -> ContentResult<ServiceId> {
        let lists = ServiceLists::encode(service)?;
        let result = sqlx::query(
            r#"
            INSERT INTO services (title, slug, description, icon, features, use_cases)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&service.title)
        .bind(&service.slug)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(&lists.features)
        .bind(&lists.use_cases)
        .execute(&self.pool)
        .await
        .map_err(map_slug_error)?;

        Ok(ServiceId::new(result.last_insert_id() as i64))
    }

    async fn update_service(&self, id: ServiceId, service: &NewService) -> ContentResult<bool> {
        let lists = ServiceLists::encode(service)?;
        let result = sqlx::query(
            r#"
            UPDATE services
            SET title = ?, slug = ?, description = ?, icon = ?, features = ?, use_cases = ?
            WHERE id = ?
            "#,
        )
        .bind(&service.title)
        .bind(&service.slug)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(&lists.features)
        .bind(&lists.use_cases)
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(map_slug_error)?;

        self.updated("services", id.get(), result.rows_affected())
            .await
    }

    async fn delete_service(&self, id: ServiceId) -> ContentResult<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Portfolio Repository Implementation
// ============================================================================

impl PortfolioRepository for MySqlContentRepository {
    async fn list_items(&self) -> ContentResult<Vec<PortfolioItem>> {
        let rows = sqlx::query_as::<_, PortfolioRow>(&format!(
            "{PORTFOLIO_SELECT} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PortfolioRow::into_item).collect())
    }

    async fn find_item(&self, id: PortfolioItemId) -> ContentResult<Option<PortfolioItem>> {
        let row = sqlx::query_as::<_, PortfolioRow>(&format!("{PORTFOLIO_SELECT} WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PortfolioRow::into_item))
    }

    async fn create_item(&self, item: &NewPortfolioItem) -> ContentResult<PortfolioItemId> {
        let lists = PortfolioLists::encode(item)?;
        let result = sqlx::query(
            r#"
            INSERT INTO portfolio_items
                (title, description, full_description, client, image_url, tags, category, results)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.full_description)
        .bind(&item.client)
        .bind(&item.image_url)
        .bind(&lists.tags)
        .bind(&item.category)
        .bind(&lists.results)
        .execute(&self.pool)
        .await?;

        Ok(PortfolioItemId::new(result.last_insert_id() as i64))
    }

    async fn update_item(
        &self,
        id: PortfolioItemId,
        item: &NewPortfolioItem,
    ) -> ContentResult<bool> {
        let lists = PortfolioLists::encode(item)?;
        let result = sqlx::query(
            r#"
            UPDATE portfolio_items
            SET title = ?, description = ?, full_description = ?, client = ?,
                image_url = ?, tags = ?, category = ?, results = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.full_description)
        .bind(&item.client)
        .bind(&item.image_url)
        .bind(&lists.tags)
        .bind(&item.category)
        .bind(&lists.results)
        .bind(id.get())
        .execute(&self.pool)
        .await?;

        self.updated("portfolio_items", id.get(), result.rows_affected())
            .await
    }

    async fn delete_item(&self, id: PortfolioItemId) -> ContentResult<bool> {
        let result = sqlx::query("DELETE FROM portfolio_items WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn item_categories(&self) -> ContentResult<Vec<String>> {
        let categories = sqlx::query_scalar(
            "SELECT DISTINCT category FROM portfolio_items WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}

// ============================================================================
// Author Directory / Stats
// ============================================================================

impl AuthorDirectory for MySqlContentRepository {
    async fn author_exists(&self, id: UserId) -> ContentResult<bool> {
        self.row_exists("users", id.get()).await
    }

    async fn first_admin(&self) -> ContentResult<Option<UserId>> {
        let id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE role = 'admin' ORDER BY id LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(id.map(UserId::new))
    }

    async fn any_user(&self) -> ContentResult<Option<UserId>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM users ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.map(UserId::new))
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    users: i64,
    blog_posts: i64,
    services: i64,
    portfolio_items: i64,
}

impl StatsRepository for MySqlContentRepository {
    async fn stats(&self) -> ContentResult<ContentStats> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM blog_posts) AS blog_posts,
                (SELECT COUNT(*) FROM services) AS services,
                (SELECT COUNT(*) FROM portfolio_items) AS portfolio_items
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ContentStats {
            users: row.users.max(0) as u64,
            blog_posts: row.blog_posts.max(0) as u64,
            services: row.services.max(0) as u64,
            portfolio_items: row.portfolio_items.max(0) as u64,
        })
    }
}
