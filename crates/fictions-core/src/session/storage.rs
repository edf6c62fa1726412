//! Key-value storage trait.

use crate::error::Result;

/// String key-value persistence, modeled on browser local storage.
///
/// Implementations decide the medium (file, memory). Values are opaque strings;
/// callers own their encoding.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never set or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Stores several entries in one update.
    ///
    /// Media that can apply the whole batch at once should override this; the
    /// default writes one entry at a time and may stop part way through.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Removes several keys in one update. Every removal is attempted by the default.
    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        keys.iter()
            .map(|key| self.remove(key))
            .fold(Ok(()), |acc, result| acc.and(result))
    }
}
