//! Request / Response DTOs

use chrono::{DateTime, Utc};
use kernel::id::{BlogPostId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::config::ContentConfig;
use crate::domain::entity::{BlogPost, BlogPostInput, NewPortfolioItem, NewService, PostStatus};
use crate::error::ContentResult;

const NO_EXCERPT: &str = "No excerpt available";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNCATEGORIZED: &str = "Uncategorized";

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlogPostRequest {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "authorId")]
    pub author_id: Option<i64>,
    pub category: Option<String>,
    #[serde(alias = "imageUrl")]
    pub image_url: Option<String>,
    /// Anything other than "published" saves a draft
    pub status: Option<String>,
}

impl BlogPostRequest {
    pub fn into_input(self, fallback_author: Option<UserId>) -> BlogPostInput {
        let status = self
            .status
            .as_deref()
            .and_then(PostStatus::from_code)
            .unwrap_or_default();

        BlogPostInput {
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            author_id: self.author_id.map(UserId::new).or(fallback_author),
            category: self.category,
            image_url: self.image_url,
            status,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceRequest {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub features: Vec<String>,
    #[serde(alias = "useCases")]
    pub use_cases: Vec<String>,
}

impl From<ServiceRequest> for NewService {
    fn from(req: ServiceRequest) -> Self {
        NewService {
            title: req.title,
            slug: req.slug,
            description: req.description,
            icon: req.icon,
            features: req.features,
            use_cases: req.use_cases,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PortfolioRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "fullDescription")]
    pub full_description: Option<String>,
    pub client: Option<String>,
    #[serde(alias = "imageUrl")]
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub results: Vec<String>,
}

impl From<PortfolioRequest> for NewPortfolioItem {
    fn from(req: PortfolioRequest) -> Self {
        NewPortfolioItem {
            title: req.title,
            description: req.description,
            full_description: req.full_description,
            client: req.client,
            image_url: req.image_url,
            tags: req.tags,
            category: req.category,
            results: req.results,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Blog card on the public listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedPost {
    pub id: BlogPostId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub author: String,
    pub category: String,
    pub image: String,
    pub slug: String,
    pub read_time: String,
}

impl FormattedPost {
    pub fn new(post: BlogPost, config: &ContentConfig) -> Self {
        Self {
            read_time: config.read_time(post.content.as_deref()),
            date: display_date(post.created_at),
            id: post.id,
            title: post.title,
            excerpt: post.excerpt.unwrap_or_else(|| NO_EXCERPT.to_string()),
            content: post.content.unwrap_or_default(),
            author: post.author_name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            category: post.category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            image: post
                .image_url
                .unwrap_or_else(|| config.post_image_placeholder.clone()),
            slug: post.slug,
        }
    }
}

/// Single post page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedPostDetail {
    pub id: BlogPostId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub author: String,
    pub author_title: String,
    pub author_bio: String,
    pub author_image: String,
    pub category: String,
    pub image: String,
    pub slug: String,
    pub read_time: String,
    pub tags: Vec<String>,
}

impl FormattedPostDetail {
    pub fn new(post: BlogPost, config: &ContentConfig) -> Self {
        let mut tags: Vec<String> = post.category.iter().cloned().collect();
        tags.extend(["AI".to_string(), "Technology".to_string()]);

        Self {
            read_time: config.read_time(post.content.as_deref()),
            date: display_date(post.created_at),
            id: post.id,
            title: post.title,
            excerpt: post.excerpt.unwrap_or_else(|| NO_EXCERPT.to_string()),
            content: post.content.unwrap_or_default(),
            author: post.author_name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            author_title: config.author_title.clone(),
            author_bio: config.author_bio.clone(),
            author_image: config.author_image_placeholder.clone(),
            category: post.category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            image: post
                .image_url
                .unwrap_or_else(|| config.post_hero_placeholder.clone()),
            slug: post.slug,
            tags,
        }
    }
}

/// "March 5, 2025"
fn display_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// `{"success": true, "<key>": <value>}`
pub fn keyed<T: Serialize>(key: &str, value: T) -> ContentResult<Value> {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert(key.into(), serde_json::to_value(value)?);
    Ok(Value::Object(body))
}

/// Creation acknowledgement carrying the new row's id under `key`
pub fn created(message: &str, key: &str, id: i64) -> Value {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert("message".into(), Value::from(message));
    body.insert(key.into(), Value::from(id));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(category: Option<&str>, content: Option<&str>) -> BlogPost {
        let at = Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap();
        BlogPost {
            id: BlogPostId::new(9),
            title: "Hello".into(),
            slug: "hello".into(),
            excerpt: None,
            content: content.map(str::to_string),
            author_id: None,
            author_name: None,
            category: category.map(str::to_string),
            image_url: None,
            status: PostStatus::Published,
            published_at: Some(at),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_card_defaults() {
        let card = FormattedPost::new(post(None, None), &ContentConfig::default());
        assert_eq!(card.excerpt, NO_EXCERPT);
        assert_eq!(card.author, UNKNOWN_AUTHOR);
        assert_eq!(card.category, UNCATEGORIZED);
        assert_eq!(card.image, "/placeholder.svg?height=200&width=400");
        assert_eq!(card.date, "March 5, 2025");
        assert_eq!(card.read_time, "3 min read");

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["readTime"], "3 min read");
        assert_eq!(json["id"], 9);
    }

    #[test]
    fn test_detail_tags_and_hero() {
        let config = ContentConfig::default();
        let detail = FormattedPostDetail::new(post(Some("ML"), Some("x".repeat(4500).as_str())), &config);
        assert_eq!(detail.tags, vec!["ML", "AI", "Technology"]);
        assert_eq!(detail.image, "/placeholder.svg?height=600&width=1200");
        assert_eq!(detail.read_time, "5 min read");
        assert_eq!(detail.author_title, "Content Writer");

        let bare = FormattedPostDetail::new(post(None, None), &config);
        assert_eq!(bare.tags, vec!["AI", "Technology"]);
        assert_eq!(bare.content, "");
    }

    #[test]
    fn test_request_status_and_author_fallback() {
        let req: BlogPostRequest = serde_json::from_value(serde_json::json!({
            "title": "T", "slug": "t", "status": "archived", "imageUrl": "/x.png"
        }))
        .unwrap();
        let input = req.into_input(Some(UserId::new(3)));
        assert_eq!(input.status, PostStatus::Draft);
        assert_eq!(input.author_id, Some(UserId::new(3)));
        assert_eq!(input.image_url.as_deref(), Some("/x.png"));

        let req: BlogPostRequest = serde_json::from_value(serde_json::json!({
            "title": "T", "slug": "t", "status": "published", "author_id": 7
        }))
        .unwrap();
        let input = req.into_input(Some(UserId::new(3)));
        assert_eq!(input.status, PostStatus::Published);
        assert_eq!(input.author_id, Some(UserId::new(7)));
    }

    #[test]
    fn test_created_body() {
        let body = created("Service created successfully", "serviceId", 4);
        assert_eq!(body["success"], true);
        assert_eq!(body["serviceId"], 4);
    }

    #[test]
    fn test_service_request_lists_default_empty() {
        let req: ServiceRequest =
            serde_json::from_value(serde_json::json!({ "title": "T", "slug": "t" })).unwrap();
        let service = NewService::from(req);
        assert!(service.features.is_empty());
        assert!(service.use_cases.is_empty());
    }
}
