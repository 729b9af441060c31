//! Convenient imports for kvqueue.
//!
//! ```
//! use kvqueue::prelude::*;
//!
//! let queues = Queues::ephemeral()?;
//! let mut q = queues.queue("work")?;
//! q.write(1)?;
//! # Ok::<(), Error>(())
//! ```

// Main entry point
pub use crate::database::{Queue, Queues, QueuesBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Core types
pub use kvqueue_core::{BackendKind, KeyValueStore, QueueName, Value};

pub use kvqueue_primitives::LinkedListQueue;
pub use kvqueue_storage::StoreConfig;
