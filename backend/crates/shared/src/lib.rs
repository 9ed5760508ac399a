//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by every crate in the workspace:
//! - The unified error type and its HTTP classification
//! - Typed integer IDs for every persisted entity
//!
//! Only things with the same meaning in auth and content belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
