//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthMiddlewareState, AuthStatus, attach_current_user, require_admin, resolve_current_user,
};
pub use router::{auth_router, dev_router};
