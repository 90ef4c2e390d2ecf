//! Local persistent storage adapters

pub mod memory;
pub mod sqlite_local_storage;

pub use memory::MemoryLocalStorage;
pub use sqlite_local_storage::SqliteLocalStorage;
