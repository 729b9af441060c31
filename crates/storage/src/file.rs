//! Spool-directory store
//!
//! Each key is one file in the spool directory holding the encoded value.
//! Writes go to a hidden temporary file that is renamed over the target, so
//! a reader never sees a half-written value. Two handles writing the same
//! key at once share that temporary name, so one writer per queue applies
//! here too.
//!
//! The spool must already exist; it is never created implicitly.

use kvqueue_core::{BackendKind, Error, KeyValueStore, Result, StoreError, StoreResult, Value};
use kvqueue_wire::{decode_value, encode_value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Longest key whose temporary file name (`.{key}.tmp`) still fits the
/// 255-byte file name limit of common filesystems
pub const MAX_KEY_LEN: usize = 249;

/// Key-value store over a spool directory
#[derive(Debug, Clone)]
pub struct FileStore {
    spool: PathBuf,
}

impl FileStore {
    /// Open a store over an existing directory
    pub fn open(spool: impl AsRef<Path>) -> Result<Self> {
        let spool = spool.as_ref();
        if !spool.is_dir() {
            return Err(Error::InvalidBackend(format!(
                "spool directory {} does not exist",
                spool.display()
            )));
        }
        info!("Opened file store at {}", spool.display());
        Ok(FileStore {
            spool: spool.to_path_buf(),
        })
    }

    /// The spool directory
    pub fn spool(&self) -> &Path {
        &self.spool
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let reject = |reason: &str| StoreError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if key.is_empty() {
            return Err(reject("key is empty"));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(reject("key too long for a file name"));
        }
        if key.starts_with('.') {
            return Err(reject("key must not start with '.'"));
        }
        if key.contains(['/', '\\', '\0']) {
            return Err(reject("key contains a path separator or NUL"));
        }
        Ok(self.spool.join(key))
    }

    fn io_error(key: &str, source: io::Error) -> StoreError {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::KeyNotFound(key.to_string())
        } else {
            StoreError::Io {
                key: key.to_string(),
                source,
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let bytes = encode_value(value)?;
        let tmp = self.spool.join(format!(".{}.tmp", key));

        fs::write(&tmp, &bytes).map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io {
                key: key.to_string(),
                source,
            });
        }
        debug!(key, bytes = bytes.len(), "wrote spool file");
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Value> {
        let path = self.path_for(key)?;
        let bytes = fs::read(&path).map_err(|e| Self::io_error(key, e))?;
        decode_value(&bytes)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        fs::remove_file(&path).map_err(|e| Self::io_error(key, e))
    }

    fn backend(&self) -> BackendKind {
        BackendKind::FileBased
    }
}
