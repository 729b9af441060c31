//! Queue primitives for kvqueue
//!
//! [`LinkedListQueue`] stores a named queue as a linked list of entries in
//! any [`KeyValueStore`](kvqueue_core::KeyValueStore). Messages are read
//! back in LIFO order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod queue;

pub use queue::LinkedListQueue;
