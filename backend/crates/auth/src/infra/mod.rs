//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod github;
pub mod memory;
pub mod mysql;

pub use github::{GithubCredentials, GithubOAuthProvider};
pub use memory::MemoryAuthRepository;
pub use mysql::MySqlAuthRepository;
