//! Core types for kvqueue
//!
//! This crate defines the vocabulary shared by every other crate:
//! - [`Value`]: payloads, node records and metadata entries
//! - [`KeyValueStore`]: the three-primitive store abstraction
//! - [`QueueName`], [`QueueKeys`], [`NodeId`]: how a queue lays out its keys
//! - [`Error`], [`StoreError`]: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod keys;
pub mod traits;
pub mod value;

pub use error::{Error, Result, StoreError, StoreResult};
pub use keys::{NodeId, QueueKeys, QueueName};
pub use traits::{BackendKind, Capabilities, KeyValueStore};
pub use value::Value;
