//! Portfolio Item Entity

use chrono::{DateTime, Utc};
use kernel::id::PortfolioItemId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioItem {
    pub id: PortfolioItemId,
    pub title: String,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub client: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub results: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every writable column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPortfolioItem {
    pub title: String,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub client: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub results: Vec<String>,
}
