//! Storage layer for session persistence.

mod file_store;
mod memory_store;

pub use file_store::{FileStoreError, JsonFileStore};
pub use memory_store::MemoryStore;
