pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;

pub use smartlink_core::repository::{LinkRecord, Repository, Result};
pub use smartlink_core::StorageError;
