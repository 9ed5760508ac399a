//! Content Backend Module
//!
//! Blog posts, services and portfolio items for the public site and the
//! admin dashboard.
//!
//! - `domain/` - Entities and repository traits
//! - `application/` - Use cases, read-time and placeholder defaults
//! - `infra/` - MySQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every mutation announces the public paths it invalidates on the shared
//! [`platform::revalidate::Revalidator`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::ContentConfig;
pub use domain::repository::ContentStore;
pub use error::{ContentError, ContentResult};
pub use infra::{MemoryContentRepository, MySqlContentRepository};
pub use presentation::{ContentAppState, content_router};
