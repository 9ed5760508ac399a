//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the
//! authorization predicate.

pub mod authorization;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use authorization::{Capability, authorize};
pub use entity::{Session, User, UserProfile};
pub use repository::{
    ActivityLogRepository, AuthStore, OAuthAccountRepository, OAuthProvider, SessionRepository,
    UserRepository,
};
