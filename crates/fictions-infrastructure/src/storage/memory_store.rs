//! In-memory key-value store.

use fictions_core::session::KeyValueStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// Non-persistent store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> fictions_core::Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| fictions_core::FictionsError::storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> fictions_core::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| fictions_core::FictionsError::storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> fictions_core::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| fictions_core::FictionsError::storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn set_many(&self, batch: &[(&str, &str)]) -> fictions_core::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| fictions_core::FictionsError::storage(e.to_string()))?;
        for (key, value) in batch {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> fictions_core::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| fictions_core::FictionsError::storage(e.to_string()))?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_batch_set_and_remove() {
        let store = MemoryStore::new();
        store.set_many(&[("token", "abc"), ("user", "{}")]).unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));

        store.remove_many(&["token", "user", "missing"]).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("user").unwrap(), None);
    }
}
