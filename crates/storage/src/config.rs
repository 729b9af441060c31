//! Backend configuration
//!
//! [`StoreConfig`] is an explicit value handed to the store factory. It can
//! be built in code, parsed from TOML, or read from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `QUEUE_BACKEND` | `backend` |
//! | `QUEUE_MEMCACHE_CONNECTION` | `memcache_connection` |
//! | `QUEUE_FILEBASED_SPOOL` | `filebased_spool` |
//! | `QUEUE_CONNECT_TIMEOUT_MS` | `connect_timeout_ms` |
//! | `QUEUE_IO_TIMEOUT_MS` | `io_timeout_ms` |
//!
//! When `backend` is unset it is inferred: a memcache connection string
//! selects memcached, otherwise a spool directory selects the file backend.
//! Anything missing is reported as `InvalidBackend` by [`StoreConfig::validate`]
//! before a store is ever created.

use crate::memcache::{parse_connection_string, MemcacheOptions};
use kvqueue_core::{BackendKind, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable selecting the backend
pub const ENV_BACKEND: &str = "QUEUE_BACKEND";
/// Environment variable holding the memcached connection string
pub const ENV_MEMCACHE_CONNECTION: &str = "QUEUE_MEMCACHE_CONNECTION";
/// Environment variable holding the spool directory
pub const ENV_FILEBASED_SPOOL: &str = "QUEUE_FILEBASED_SPOOL";
/// Environment variable holding the connect timeout in milliseconds
pub const ENV_CONNECT_TIMEOUT_MS: &str = "QUEUE_CONNECT_TIMEOUT_MS";
/// Environment variable holding the I/O timeout in milliseconds
pub const ENV_IO_TIMEOUT_MS: &str = "QUEUE_IO_TIMEOUT_MS";

const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Backend to use; inferred when unset
    pub backend: Option<BackendKind>,
    /// `host:port` addresses separated by `;`
    pub memcache_connection: Option<String>,
    /// Existing directory for the file backend
    pub filebased_spool: Option<PathBuf>,
    /// TCP connect timeout for memcached
    pub connect_timeout_ms: u64,
    /// Read/write timeout for memcached
    pub io_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: None,
            memcache_connection: None,
            filebased_spool: None,
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            io_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// A validated backend selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedBackend {
    /// memcached servers with connection options
    Memcached {
        /// The raw connection string
        connection: String,
        /// Timeouts
        options: MemcacheOptions,
    },
    /// Spool directory
    FileBased {
        /// The spool directory
        spool: PathBuf,
    },
    /// In-process store
    Memory,
}

impl ResolvedBackend {
    /// Which backend this is
    pub fn kind(&self) -> BackendKind {
        match self {
            ResolvedBackend::Memcached { .. } => BackendKind::Memcached,
            ResolvedBackend::FileBased { .. } => BackendKind::FileBased,
            ResolvedBackend::Memory => BackendKind::Memory,
        }
    }
}

impl StoreConfig {
    /// memcached over the given `;`-separated servers
    pub fn memcached(connection: impl Into<String>) -> Self {
        StoreConfig {
            backend: Some(BackendKind::Memcached),
            memcache_connection: Some(connection.into()),
            ..Default::default()
        }
    }

    /// File backend over an existing spool directory
    pub fn filebased(spool: impl AsRef<Path>) -> Self {
        StoreConfig {
            backend: Some(BackendKind::FileBased),
            filebased_spool: Some(spool.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// In-process store
    pub fn memory() -> Self {
        StoreConfig {
            backend: Some(BackendKind::Memory),
            ..Default::default()
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let timeout = |name: &str| -> Result<u64> {
            match get(name) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    Error::InvalidBackend(format!("{} is not a number of milliseconds: {:?}", name, raw))
                }),
                None => Ok(DEFAULT_TIMEOUT_MS),
            }
        };

        Ok(StoreConfig {
            backend: get(ENV_BACKEND).map(|b| b.parse()).transpose()?,
            memcache_connection: get(ENV_MEMCACHE_CONNECTION),
            filebased_spool: get(ENV_FILEBASED_SPOOL).map(PathBuf::from),
            connect_timeout_ms: timeout(ENV_CONNECT_TIMEOUT_MS)?,
            io_timeout_ms: timeout(ENV_IO_TIMEOUT_MS)?,
        })
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::InvalidBackend(format!("bad config: {}", e)))
    }

    /// Load a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidBackend(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::InvalidBackend(e.to_string()))
    }

    /// Memcached connection options from the timeout fields
    pub fn memcache_options(&self) -> MemcacheOptions {
        MemcacheOptions {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            io_timeout: Duration::from_millis(self.io_timeout_ms),
        }
    }

    /// Validate and pick the backend
    pub fn validate(&self) -> Result<ResolvedBackend> {
        let connection = self
            .memcache_connection
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let kind = match self.backend {
            Some(kind) => kind,
            None if connection.is_some() => BackendKind::Memcached,
            None if self.filebased_spool.is_some() => BackendKind::FileBased,
            None => {
                return Err(Error::InvalidBackend(format!(
                    "no backend configured: set {} or {}",
                    ENV_MEMCACHE_CONNECTION, ENV_FILEBASED_SPOOL
                )))
            }
        };

        match kind {
            BackendKind::Memcached => {
                let connection = connection.ok_or_else(|| {
                    Error::InvalidBackend(format!("{} not set", ENV_MEMCACHE_CONNECTION))
                })?;
                if parse_connection_string(connection).is_empty() {
                    return Err(Error::InvalidBackend(format!(
                        "{} lists no servers",
                        ENV_MEMCACHE_CONNECTION
                    )));
                }
                if self.connect_timeout_ms == 0 || self.io_timeout_ms == 0 {
                    return Err(Error::InvalidBackend("timeouts must be non-zero".to_string()));
                }
                Ok(ResolvedBackend::Memcached {
                    connection: connection.to_string(),
                    options: self.memcache_options(),
                })
            }
            BackendKind::FileBased => {
                let spool = self.filebased_spool.as_ref().ok_or_else(|| {
                    Error::InvalidBackend(format!("{} not set", ENV_FILEBASED_SPOOL))
                })?;
                if !spool.is_dir() {
                    return Err(Error::InvalidBackend(format!(
                        "spool directory {} does not exist",
                        spool.display()
                    )));
                }
                Ok(ResolvedBackend::FileBased {
                    spool: spool.clone(),
                })
            }
            BackendKind::Memory => Ok(ResolvedBackend::Memory),
        }
    }
}
