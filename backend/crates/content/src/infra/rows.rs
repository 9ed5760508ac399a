//! Row types shared by the MySQL and in-memory repositories
//!
//! List-valued fields are stored as JSON text and decoded here, so
//! repository callers only ever see `Vec<String>`.

use chrono::{DateTime, Utc};
use kernel::id::{BlogPostId, PortfolioItemId, ServiceId, UserId};

use crate::domain::entity::{
    BlogPost, NewPortfolioItem, NewService, PortfolioItem, PostStatus, Service,
};
use crate::error::ContentResult;

pub(crate) fn encode_list(values: &[String]) -> ContentResult<String> {
    Ok(serde_json::to_string(values)?)
}

/// Missing or malformed columns read as an empty list
pub(crate) fn decode_list(column: &'static str, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Vec::new();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(column, error = %e, "Malformed JSON list column");
        Vec::new()
    })
}

// ============================================================================
// Blog Posts
// ============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct BlogPostRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPostRow {
    pub fn into_post(self) -> BlogPost {
        let status = PostStatus::from_code(&self.status).unwrap_or_else(|| {
            tracing::warn!(post_id = self.id, status = %self.status, "Unknown post status, treating as draft");
            PostStatus::Draft
        });

        BlogPost {
            id: BlogPostId::new(self.id),
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            author_id: self.author_id.map(UserId::new),
            author_name: self.author_name,
            category: self.category,
            image_url: self.image_url,
            status,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ============================================================================
// Services
// ============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ServiceRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub features: Option<String>,
    pub use_cases: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRow {
    pub fn into_service(self) -> Service {
        Service {
            id: ServiceId::new(self.id),
            features: decode_list("features", self.features.as_deref()),
            use_cases: decode_list("use_cases", self.use_cases.as_deref()),
            title: self.title,
            slug: self.slug,
            description: self.description,
            icon: self.icon,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Encoded list columns of a service write
pub(crate) struct ServiceLists {
    pub features: String,
    pub use_cases: String,
}

impl ServiceLists {
    pub fn encode(service: &NewService) -> ContentResult<Self> {
        Ok(Self {
            features: encode_list(&service.features)?,
            use_cases: encode_list(&service.use_cases)?,
        })
    }
}

// ============================================================================
// Portfolio Items
// ============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct PortfolioRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub client: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub category: Option<String>,
    pub results: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PortfolioRow {
    pub fn into_item(self) -> PortfolioItem {
        PortfolioItem {
            id: PortfolioItemId::new(self.id),
            tags: decode_list("tags", self.tags.as_deref()),
            results: decode_list("results", self.results.as_deref()),
            title: self.title,
            description: self.description,
            full_description: self.full_description,
            client: self.client,
            image_url: self.image_url,
            category: self.category,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub(crate) struct PortfolioLists {
    pub tags: String,
    pub results: String,
}

impl PortfolioLists {
    pub fn encode(item: &NewPortfolioItem) -> ContentResult<Self> {
        Ok(Self {
            tags: encode_list(&item.tags)?,
            results: encode_list(&item.results)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_round_trip_keeps_order() {
        let values = vec!["b".to_string(), "a".to_string(), "c, d".to_string()];
        let encoded = encode_list(&values).unwrap();
        assert_eq!(decode_list("tags", Some(&encoded)), values);
    }

    #[test]
    fn test_missing_or_malformed_lists_are_empty() {
        assert!(decode_list("tags", None).is_empty());
        assert!(decode_list("tags", Some("")).is_empty());
        assert!(decode_list("tags", Some("not json")).is_empty());
        assert!(decode_list("tags", Some("[1, 2]")).is_empty());
    }
}
