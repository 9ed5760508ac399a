//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations used by the domain crates:
//! - Random session tokens and SHA-256 digests
//! - Password hashing (legacy SHA-256 hex, Argon2id)
//! - Cookie building and parsing
//! - Client identification (IP, User-Agent)
//! - Route revalidation bus

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod revalidate;
