//! Infrastructure Layer

pub mod memory;
pub mod mysql;
pub(crate) mod rows;

pub use memory::MemoryContentRepository;
pub use mysql::MySqlContentRepository;
