//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod memory;
pub mod query_cache;
pub mod repository;

pub use config::Config;
pub use memory::MemoryStore;
pub use query_cache::QueryCache;
pub use repository::{ContentStore, FileSystemStore, MarkerQuery};
