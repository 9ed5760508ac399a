//! Domain Entities

pub mod blog_post;
pub mod portfolio_item;
pub mod service;
pub mod stats;

pub use blog_post::{BlogPost, BlogPostInput, NewBlogPost, PostStatus, next_published_at};
pub use portfolio_item::{NewPortfolioItem, PortfolioItem};
pub use service::{NewService, Service};
pub use stats::ContentStats;
