//! Store abstraction
//!
//! [`KeyValueStore`] is the only seam between queues and storage. A backend
//! provides three primitives (`set`, `get`, `delete`) plus optional admin
//! operations that default to [`Error::NotImplemented`]. Callers should
//! consult [`Capabilities`] before using the optional ones.

use crate::error::{Error, Result, StoreResult};
use crate::keys::QueueName;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// memcached text protocol (memcached, starling, peafowl, ...)
    Memcached,
    /// One file per key in a spool directory
    #[serde(alias = "file")]
    FileBased,
    /// Process-local store with no I/O
    Memory,
}

impl BackendKind {
    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memcached => "memcached",
            BackendKind::FileBased => "filebased",
            BackendKind::Memory => "memory",
        }
    }

    /// What this backend supports beyond the three primitives
    pub fn capabilities(&self) -> Capabilities {
        match self {
            BackendKind::Memcached => Capabilities {
                list_queues: true,
                delete_queue: false,
                max_key_bytes: 250,
            },
            BackendKind::FileBased => Capabilities {
                list_queues: false,
                delete_queue: false,
                max_key_bytes: 249,
            },
            BackendKind::Memory => Capabilities {
                list_queues: false,
                delete_queue: false,
                max_key_bytes: usize::MAX,
            },
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memcached" | "memcache" => Ok(BackendKind::Memcached),
            "filebased" | "file" => Ok(BackendKind::FileBased),
            "memory" => Ok(BackendKind::Memory),
            other => Err(Error::InvalidBackend(format!("unknown backend {:?}", other))),
        }
    }
}

/// Optional operations a backend supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// `list_queues` is implemented
    pub list_queues: bool,
    /// `delete_queue` is implemented
    pub delete_queue: bool,
    /// Longest key the backend accepts
    pub max_key_bytes: usize,
}

/// A key-value store that queues are built on
///
/// Implementations must report a missing key from `get` and `delete` as
/// [`StoreError::KeyNotFound`](crate::error::StoreError::KeyNotFound) so
/// callers can tell absence from failure.
pub trait KeyValueStore: Send {
    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &Value) -> StoreResult<()>;

    /// Load the value stored under `key`
    fn get(&self, key: &str) -> StoreResult<Value>;

    /// Remove `key`
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// Which backend this is
    fn backend(&self) -> BackendKind;

    /// Optional operations this store supports
    fn capabilities(&self) -> Capabilities {
        self.backend().capabilities()
    }

    /// Create a queue ahead of use.
    ///
    /// Queues are created implicitly on construction, so this is a no-op
    /// that always succeeds.
    fn create_queue(&self) -> Result<bool> {
        Ok(true)
    }

    /// Names of the queues the backend knows about
    fn list_queues(&self) -> Result<Vec<String>> {
        Err(Error::NotImplemented("list_queues"))
    }

    /// Drop a queue and all its entries
    fn delete_queue(&self, _name: &QueueName) -> Result<()> {
        Err(Error::NotImplemented("delete_queue"))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<Value> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn backend(&self) -> BackendKind {
        (**self).backend()
    }

    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn create_queue(&self) -> Result<bool> {
        (**self).create_queue()
    }

    fn list_queues(&self) -> Result<Vec<String>> {
        (**self).list_queues()
    }

    fn delete_queue(&self, name: &QueueName) -> Result<()> {
        (**self).delete_queue(name)
    }
}
