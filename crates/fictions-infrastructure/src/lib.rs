//! Infrastructure layer: filesystem paths, session persistence and configuration loading.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::FictionsPaths;
pub use crate::storage::{JsonFileStore, MemoryStore};
