//! Domain Layer
//!
//! Entities and repository traits for blog posts, services and portfolio
//! items.

pub mod entity;
pub mod repository;

pub use repository::{
    AuthorDirectory, BlogPostRepository, ContentStore, PortfolioRepository, ServiceRepository,
    StatsRepository,
};
