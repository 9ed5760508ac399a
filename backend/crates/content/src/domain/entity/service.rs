//! Service Entity

use chrono::{DateTime, Utc};
use kernel::id::ServiceId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// Icon name understood by the frontend
    pub icon: Option<String>,
    pub features: Vec<String>,
    pub use_cases: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every writable column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewService {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub features: Vec<String>,
    pub use_cases: Vec<String>,
}
