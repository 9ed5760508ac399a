//! Dashboard counters

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub users: u64,
    pub blog_posts: u64,
    pub services: u64,
    pub portfolio_items: u64,
}
