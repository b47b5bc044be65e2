//! Durable client storage.
//!
//! A small string key-value store standing in for the browser's local
//! storage. It holds the session token and the staging flag.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

/// Storage keys.
pub mod keys {
    /// Key for the session token.
    pub const TOKEN: &str = "token";

    /// Key for the staging login flag.
    pub const STAGING_AUTHENTICATED: &str = "staging_authenticated";
}

/// Errors that can occur while reading or writing client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage that survives restarts.
pub trait ClientStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON object in a single file.
///
/// Every write rewrites the whole file through a sibling temp file and a
/// rename, so readers see either the old or the new contents. A corrupt file
/// is replaced wholesale by the next write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(values).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!(path = %self.path.display(), "client storage written");
        Ok(())
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = match self.read() {
            Err(StorageError::Corrupt { path, source }) => {
                warn!(path = %path.display(), error = %source, "discarding corrupt client storage");
                BTreeMap::new()
            }
            other => other?,
        };
        apply(&mut values);
        self.write(&values)
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("newtab-storage-{}-{name}", std::process::id()))
            .join("storage.json")
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
        storage.set(keys::TOKEN, "tok_1").unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("tok_1"));
        storage.remove(keys::TOKEN).unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        FileStorage::new(&path).set(keys::TOKEN, "tok_1").unwrap();
        FileStorage::new(&path)
            .set(keys::STAGING_AUTHENTICATED, "true")
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(keys::TOKEN).unwrap().as_deref(), Some("tok_1"));
        assert_eq!(
            reopened.get(keys::STAGING_AUTHENTICATED).unwrap().as_deref(),
            Some("true")
        );

        reopened.remove(keys::TOKEN).unwrap();
        assert_eq!(FileStorage::new(&path).get(keys::TOKEN).unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let storage = FileStorage::new(temp_path("missing"));
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).get(keys::TOKEN).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_storage_write_replaces_corrupt_file() {
        let path = temp_path("repair");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"token": "tok_"#).unwrap();

        let storage = FileStorage::new(&path);
        storage.remove(keys::TOKEN).unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);

        storage.set(keys::STAGING_AUTHENTICATED, "true").unwrap();
        assert_eq!(
            storage.get(keys::STAGING_AUTHENTICATED).unwrap().as_deref(),
            Some("true")
        );
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
