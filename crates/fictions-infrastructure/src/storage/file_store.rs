//! File-backed key-value store.
//!
//! Keeps all entries in a single JSON object on disk. Writes go through a temp
//! file and an atomic rename, under an exclusive lock.

use fictions_core::FictionsError;
use fictions_core::session::KeyValueStore;
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

type Entries = BTreeMap<String, String>;

/// Distinguishes temp files of concurrent writers within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors that can occur during file store operations.
#[derive(Debug)]
pub enum FileStoreError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing or serialization error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStoreError::IoError(e) => write!(f, "I/O error: {}", e),
            FileStoreError::JsonError(e) => write!(f, "JSON error: {}", e),
            FileStoreError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for FileStoreError {}

impl From<std::io::Error> for FileStoreError {
    fn from(e: std::io::Error) -> Self {
        FileStoreError::IoError(e)
    }
}

impl From<serde_json::Error> for FileStoreError {
    fn from(e: serde_json::Error) -> Self {
        FileStoreError::JsonError(e)
    }
}

impl From<FileStoreError> for FictionsError {
    fn from(e: FileStoreError) -> Self {
        FictionsError::storage(e.to_string())
    }
}

/// A JSON file holding string entries, the on-disk stand-in for local storage.
///
/// Provides:
/// - **Atomicity**: Writes are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: An exclusive lock on a sibling `.lock` file serializes
///   read-modify-write cycles across threads and processes; every writer
///   stages its data in its own temp file
/// - **Durability**: Explicit fsync before rename
///
/// A file that exists but is not a JSON object of strings is treated as empty
/// on read and overwritten on the next write.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a new store handle. Nothing touches the disk until the first write.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all entries.
    ///
    /// # Returns
    ///
    /// - `Ok(entries)`: Parsed entries; empty when the file is missing, blank or corrupt
    /// - `Err`: The file exists but could not be read
    fn load(&self) -> Result<Entries, FileStoreError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("Ignoring corrupt store file {}: {}", self.path.display(), e);
                Ok(Entries::new())
            }
        }
    }

    /// Writes all entries atomically.
    fn save(&self, entries: &Entries) -> Result<(), FileStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;

        let tmp_path = self.get_temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        restrict_permissions(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        Ok(())
    }

    /// Applies `f` to the current entries and writes the result back under the lock.
    fn update<F>(&self, f: F) -> Result<(), FileStoreError>
    where
        F: FnOnce(&mut Entries),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }

    fn get_temp_path(&self) -> Result<PathBuf, FileStoreError> {
        let parent = self.path.parent().ok_or_else(|| {
            FileStoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            FileStoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(
            ".{}.{}.{}.tmp",
            file_name.to_string_lossy(),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        Ok(parent.join(tmp_name))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> fictions_core::Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> fictions_core::Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> fictions_core::Result<()> {
        self.remove_many(&[key])
    }

    fn set_many(&self, batch: &[(&str, &str)]) -> fictions_core::Result<()> {
        self.update(|entries| {
            for (key, value) in batch {
                entries.insert(key.to_string(), value.to_string());
            }
        })?;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> fictions_core::Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })?;
        Ok(())
    }
}

/// The session file holds a bearer token: owner read/write only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), FileStoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), FileStoreError> {
    Ok(())
}

/// Exclusive lock on the store's `.lock` sibling, released when dropped.
///
/// The lock file itself is never deleted: a writer blocked on it must end up
/// holding the same inode as every later writer.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, FileStoreError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        FileExt::lock_exclusive(&file)
            .map_err(|e| FileStoreError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release store lock: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("session.json"));

        assert_eq!(store.get("token").unwrap(), None);

        store.set("token", "abc").unwrap();
        store.set("user", "{}").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        JsonFileStore::new(path.clone()).set("token", "abc").unwrap();

        let reopened = JsonFileStore::new(path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_remove_on_missing_file_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = JsonFileStore::new(path.clone());

        store.remove("token").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_repaired() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{ invalid json").unwrap();
        let store = JsonFileStore::new(path);

        assert_eq!(store.get("token").unwrap(), None);
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = JsonFileStore::new(path.clone());

        store.set("token", "abc").unwrap();
        store.set_many(&[("token", "def"), ("user", "{}")]).unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "leftover temp files: {:?}", leftovers);
        // The lock file stays so later writers share one lock.
        assert!(temp_dir.path().join("session.lock").exists());
    }

    #[test]
    fn test_batch_write_is_one_update() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = JsonFileStore::new(path.clone());

        store.set_many(&[("token", "abc"), ("user", "{}")]).unwrap();
        let on_disk: Entries = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 2);

        store.remove_many(&["token", "user"]).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("user").unwrap(), None);
    }

    #[test]
    fn test_concurrent_logins_keep_token_and_user_paired() {
        use fictions_core::session::SessionStore;
        use fictions_core::user::UserProfile;
        use std::sync::Arc;
        use std::thread;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let user = |n: u32| UserProfile {
            id: format!("u{n}"),
            username: format!("user{n}"),
            email: format!("user{n}@b.com"),
            created_at: None,
        };

        for _ in 0..50 {
            let writers: Vec<_> = (1..=2)
                .map(|n| {
                    let store = SessionStore::new(Arc::new(JsonFileStore::new(path.clone())));
                    let profile = user(n);
                    thread::spawn(move || store.save(&format!("tok-u{n}"), &profile))
                })
                .collect();
            for writer in writers {
                writer.join().unwrap().unwrap();
            }

            let store = SessionStore::new(Arc::new(JsonFileStore::new(path.clone())));
            let session = store.current().unwrap();
            let owner = session.user.unwrap();
            assert_eq!(session.token, format!("tok-{}", owner.id));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        JsonFileStore::new(path.clone()).set("token", "abc").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
