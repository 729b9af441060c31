//! Key-value store backends for kvqueue
//!
//! Three implementations of [`KeyValueStore`]:
//! - [`MemcacheStore`]: memcached text protocol over one or more servers
//! - [`FileStore`]: one file per key in a spool directory
//! - [`MemoryStore`]: process-local map, for tests and ephemeral use
//!
//! [`StoreConfig`] selects and validates a backend, and [`StoreFactory`]
//! opens handles for it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod factory;
pub mod file;
pub mod memcache;
pub mod memory;

pub use config::{ResolvedBackend, StoreConfig};
pub use factory::{open_store, StoreFactory};
pub use file::FileStore;
pub use memcache::{MemcacheOptions, MemcacheStore};
pub use memory::MemoryStore;

pub use kvqueue_core::KeyValueStore;
