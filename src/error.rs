//! Error types for kvqueue.
//!
//! Every queue operation fails with [`Error`]. Faults raised by a store are
//! wrapped as [`Error::Store`] and carry a [`StoreError`].

pub use kvqueue_core::error::{Error, Result, StoreError, StoreResult};
