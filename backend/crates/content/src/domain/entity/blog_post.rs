//! Blog Post Entity
//!
//! `published_at` is set the first time a post is saved as published and
//! never changes afterwards, even if the post goes back to draft.

use chrono::{DateTime, Utc};
use kernel::id::{BlogPostId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<UserId>,
    /// Display name of the author, `None` once the author is deleted
    pub author_name: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields submitted by the admin form
#[derive(Debug, Clone, Default)]
pub struct BlogPostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<UserId>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: PostStatus,
}

/// Every writable column. Used for insert and for full-row update.
#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author_id: UserId,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
}

/// `published_at` for a write with `status`, given the stored value
pub fn next_published_at(
    status: PostStatus,
    previous: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (previous, status) {
        (Some(at), _) => Some(at),
        (None, PostStatus::Published) => Some(now),
        (None, PostStatus::Draft) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_first_publish_sets_timestamp() {
        let now = Utc::now();
        assert_eq!(next_published_at(PostStatus::Published, None, now), Some(now));
        assert_eq!(next_published_at(PostStatus::Draft, None, now), None);
    }

    #[test]
    fn test_republish_keeps_timestamp() {
        let first = Utc::now() - Duration::days(3);
        let now = Utc::now();
        assert_eq!(
            next_published_at(PostStatus::Published, Some(first), now),
            Some(first)
        );
        assert_eq!(
            next_published_at(PostStatus::Draft, Some(first), now),
            Some(first)
        );
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in [PostStatus::Draft, PostStatus::Published] {
            assert_eq!(PostStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(PostStatus::from_code("archived"), None);
    }
}
