//! Storage backends for the cache snapshot.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::debug;

use super::CacheStorage;
use crate::errors::PersistenceError;

/// Snapshot stored as one JSON file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash mid-write leaves the previous snapshot in place.
pub struct FileCacheStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCacheStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CacheStorage for FileCacheStorage {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write(&self, payload: &str) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::Write(e.to_string()))?;
            }
        }

        let temp = self.temp_path();
        let write_temp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&temp)?;
            file.write_all(payload.as_bytes())?;
            file.sync_all()
        };
        write_temp().map_err(|e| PersistenceError::Write(format!("{}: {}", temp.display(), e)))?;

        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            PersistenceError::Write(format!("{}: {}", self.path.display(), e))
        })?;

        debug!("Wrote cache snapshot to {}", self.path.display());
        Ok(())
    }
}

/// Snapshot held in process memory.
#[derive(Default)]
pub struct MemoryCacheStorage {
    record: Mutex<Option<String>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a raw record.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
        }
    }

    /// The raw record last written, if any.
    pub fn record(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.lock().clone())
    }

    fn write(&self, payload: &str) -> Result<(), PersistenceError> {
        *self.lock() = Some(payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path().join("quote_cache.json"));
        assert_eq!(storage.read().unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path().join("nested").join("quote_cache.json"));

        storage.write(r#"{"a":1}"#).unwrap();
        storage.write(r#"{"a":2}"#).unwrap();

        assert_eq!(storage.read().unwrap().as_deref(), Some(r#"{"a":2}"#));
        assert!(!dir.path().join("nested").join("quote_cache.json.tmp").exists());
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file
        let storage = FileCacheStorage::new(dir.path());
        assert!(matches!(storage.read(), Err(PersistenceError::Read(_))));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryCacheStorage::new();
        assert_eq!(storage.read().unwrap(), None);
        storage.write("x").unwrap();
        assert_eq!(storage.record().as_deref(), Some("x"));

        let seeded = MemoryCacheStorage::with_record("y");
        assert_eq!(seeded.read().unwrap().as_deref(), Some("y"));
    }
}
