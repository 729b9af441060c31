//! Wire formats for kvqueue
//!
//! - [`codec`]: how a [`Value`](kvqueue_core::Value) becomes bytes in a store
//! - [`memcache`]: the memcached text protocol subset used by the networked
//!   backend
//!
//! ## Examples
//!
//! ```
//! use kvqueue_core::Value;
//! use kvqueue_wire::{decode_value, encode_value};
//!
//! let node = Value::Array(vec![Value::Int(42), Value::Null]);
//! let bytes = encode_value(&node).unwrap();
//! assert_eq!(decode_value(&bytes).unwrap(), node);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod memcache;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use codec::{decode_value, encode_value, FORMAT_VERSION};
pub use memcache::{Command, ProtocolError, Status};
