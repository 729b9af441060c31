//! # kvqueue
//!
//! Named message queues stored as linked lists in a key-value store.
//!
//! A queue is three kinds of entries: a head pointer, a length counter and
//! one node per message. Any store that can `set`, `get` and `delete` a
//! [`Value`] can hold queues. Three backends ship with the crate:
//!
//! - **memcached**: one or more servers speaking the memcached text protocol
//! - **filebased**: one file per key in a spool directory
//! - **memory**: a process-local map
//!
//! ## Quick Start
//!
//! ```
//! use kvqueue::prelude::*;
//!
//! let queues = Queues::ephemeral()?;
//! let mut q = queues.queue("emails")?;
//!
//! q.write("first")?;
//! q.write("second")?;
//! assert_eq!(q.length()?, 2);
//!
//! // Most recent first
//! assert_eq!(q.read()?, Some(Value::from("second")));
//! assert_eq!(q.read()?, Some(Value::from("first")));
//! assert_eq!(q.read()?, None);
//! # Ok::<(), kvqueue::Error>(())
//! ```
//!
//! ## Ordering
//!
//! Messages come back in **LIFO** order: `read` returns the most recently
//! written message.
//!
//! ## Configuration
//!
//! [`Queues::from_env`] reads `QUEUE_BACKEND`, `QUEUE_MEMCACHE_CONNECTION`
//! and `QUEUE_FILEBASED_SPOOL`; [`StoreConfig`] can also be loaded from TOML
//! or built in code with [`Queues::builder`].

#![warn(missing_docs)]

mod database;
mod error;

pub mod prelude;

// Re-export main entry points
pub use database::{Queue, Queues, QueuesBuilder};
pub use error::{Error, Result, StoreError, StoreResult};

// Re-export building blocks
pub use kvqueue_core::{
    BackendKind, Capabilities, KeyValueStore, NodeId, QueueKeys, QueueName, Value,
};
pub use kvqueue_primitives::LinkedListQueue;
pub use kvqueue_storage::{
    open_store, FileStore, MemcacheOptions, MemcacheStore, MemoryStore, StoreConfig,
    StoreFactory,
};
