//! Persisted session storage
//!
//! A `SessionStorage` holds exactly one serialized record under a fixed key.
//! - `FileStorage`: `<dir>/user.json`, written atomically
//! - `MemoryStorage`: in-process, for tests and ephemeral use

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Key the session record is stored under
pub const SESSION_STORAGE_KEY: &str = "user";

/// Read/write/delete contract for the persisted session record
pub trait SessionStorage: Send + Sync {
    /// The raw record, or `None` if nothing is stored
    fn read(&self) -> Result<Option<String>>;

    fn write(&self, record: &str) -> Result<()>;

    /// Delete the record; deleting a missing record is not an error
    fn remove(&self) -> Result<()>;
}

/// Session record stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Store the record as `<dir>/user.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir
                .as_ref()
                .join(format!("{}.json", SESSION_STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write(&self, record: &str) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::Storage("Session path has no parent directory".into()))?;
        fs::create_dir_all(dir)?;

        // Write to a temp file in the same directory, then rename over the target
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(record.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|e| Error::Storage(format!("Failed to save session: {}", e.error)))?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Session record held in memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a record already stored
    pub fn with_record(record: &str) -> Self {
        Self {
            record: Mutex::new(Some(record.to_string())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.record.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.lock().clone())
    }

    fn write(&self, record: &str) -> Result<()> {
        *self.lock() = Some(record.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert!(storage.read().unwrap().is_none());
        storage.write(r#"{"a":1}"#).unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert!(storage.path().ends_with("user.json"));

        storage.write(r#"{"a":2}"#).unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some(r#"{"a":2}"#));
    }

    #[test]
    fn test_file_storage_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.remove().unwrap();
        storage.write("x").unwrap();
        storage.remove().unwrap();
        storage.remove().unwrap();
        assert!(storage.read().unwrap().is_none());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::with_record("seed");
        assert_eq!(storage.read().unwrap().as_deref(), Some("seed"));
        storage.remove().unwrap();
        assert!(storage.read().unwrap().is_none());
    }
}
