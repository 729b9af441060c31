//! Store factory
//!
//! Turns a [`StoreConfig`] into boxed [`KeyValueStore`] handles. The
//! configuration is validated once, when the factory is built. Each call to
//! [`StoreFactory::open`] returns a fresh handle so that every queue owns its
//! own connection; memory handles share one map.

use crate::config::{ResolvedBackend, StoreConfig};
use crate::file::FileStore;
use crate::memcache::MemcacheStore;
use crate::memory::MemoryStore;
use kvqueue_core::{BackendKind, KeyValueStore, Result};
use tracing::debug;

/// Creates store handles for one configured backend
#[derive(Debug, Clone)]
pub struct StoreFactory {
    backend: ResolvedBackend,
    memory: MemoryStore,
}

impl StoreFactory {
    /// Validate `config` and build a factory
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Ok(StoreFactory {
            backend: config.validate()?,
            memory: MemoryStore::new(),
        })
    }

    /// Factory over an existing memory store
    pub fn with_memory(memory: MemoryStore) -> Self {
        StoreFactory {
            backend: ResolvedBackend::Memory,
            memory,
        }
    }

    /// Which backend handles are created for
    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }

    /// The shared map behind memory handles
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Open a new store handle
    pub fn open(&self) -> Result<Box<dyn KeyValueStore>> {
        debug!(backend = %self.backend.kind(), "opening store handle");
        Ok(match &self.backend {
            ResolvedBackend::Memcached {
                connection,
                options,
            } => Box::new(MemcacheStore::new(connection, *options)?),
            ResolvedBackend::FileBased { spool } => Box::new(FileStore::open(spool)?),
            ResolvedBackend::Memory => Box::new(self.memory.clone()),
        })
    }
}

/// Validate `config` and open a single store handle
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn KeyValueStore>> {
    StoreFactory::new(config)?.open()
}
