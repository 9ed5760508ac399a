//! Application Layer
//!
//! Use cases for blog posts, services, portfolio items and dashboard stats.

pub mod blog;
pub mod config;
pub mod portfolio;
pub mod services;
pub mod stats;

mod support;

// Re-exports
pub use blog::BlogUseCase;
pub use config::ContentConfig;
pub use portfolio::PortfolioUseCase;
pub use services::ServiceUseCase;
pub use stats::StatsUseCase;
