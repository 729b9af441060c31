//! LinkedListQueue: a queue stored as a linked list of key-value entries
//!
//! ## Layout
//!
//! Each queue owns three kinds of entries in its store:
//!
//! | Entry | Key | Value |
//! |-------|-----|-------|
//! | head  | `kvq.{name}.head` | `String(node_id)` or `Null` |
//! | len   | `kvq.{name}.len`  | `Int(n)` |
//! | node  | `kvq.{name}.node.{node_id}` | `Array([payload, next])` |
//!
//! Node ids are UUIDv7 and never reused. The chain from head has exactly
//! `len` nodes and ends in a `Null` next.
//!
//! ## Ordering
//!
//! The list is pushed and popped at the head, so the queue behaves as a
//! **stack**: the most recently written message is read first.
//!
//! ## Concurrency
//!
//! Every operation is a sequence of independent store calls with no locking
//! or compare-and-swap. Two handles working on the same queue name at once
//! can lose writes (leaving orphan nodes) or return one payload twice. Use
//! one handle per queue name.
//!
//! ## Failures
//!
//! Store faults are propagated, never swallowed. After a failed `write` or
//! `read` the queue may be partially updated and should be re-verified.

use kvqueue_core::{
    Error, KeyValueStore, NodeId, QueueKeys, QueueName, Result, StoreError, Value,
};
use std::fmt;
use tracing::{debug, info};

/// A named queue over a [`KeyValueStore`]
///
/// Construction resets the queue: whatever was stored under the name before
/// is abandoned and the queue starts empty.
///
/// # Example
///
/// ```
/// use kvqueue_primitives::LinkedListQueue;
/// use kvqueue_storage::MemoryStore;
///
/// let mut queue = LinkedListQueue::new(MemoryStore::new(), "jobs")?;
/// queue.write(1)?;
/// queue.write(2)?;
/// assert_eq!(queue.length()?, 2);
/// assert_eq!(queue.read()?, Some(2.into()));
/// assert_eq!(queue.read()?, Some(1.into()));
/// assert_eq!(queue.read()?, None);
/// # Ok::<(), kvqueue_core::Error>(())
/// ```
pub struct LinkedListQueue<S: KeyValueStore> {
    store: S,
    name: QueueName,
    keys: QueueKeys,
}

impl<S: KeyValueStore> LinkedListQueue<S> {
    /// Validate `name` and reset the queue stored under it
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidName`] if `name` is not a valid queue name
    /// - [`Error::BackendUnavailable`] if the store cannot be written
    pub fn new(store: S, name: &str) -> Result<Self> {
        Self::with_name(store, QueueName::new(name)?)
    }

    /// Reset the queue stored under an already validated name
    pub fn with_name(store: S, name: QueueName) -> Result<Self> {
        let keys = QueueKeys::new(&name);
        let queue = LinkedListQueue { store, name, keys };
        queue.reset().map_err(|e| {
            Error::BackendUnavailable(format!(
                "cannot initialize queue {} on {}: {}",
                queue.name,
                queue.store.backend(),
                e
            ))
        })?;
        info!(queue = %queue.name, backend = %queue.store.backend(), "Queue reset");
        Ok(queue)
    }

    fn reset(&self) -> std::result::Result<(), StoreError> {
        self.store.set(self.keys.head_key(), &Value::Null)?;
        self.store.set(self.keys.len_key(), &Value::Int(0))
    }

    // ========================================================================
    // Queue operations
    // ========================================================================

    /// Push `message` onto the head of the list
    ///
    /// Always returns `Ok(true)` on success.
    pub fn write(&mut self, message: impl Into<Value>) -> Result<bool> {
        let next = self.head()?;
        let node_id = NodeId::new().to_string();

        let node = Value::Array(vec![
            message.into(),
            next.map(Value::String).unwrap_or(Value::Null),
        ]);
        self.store.set(&self.keys.node_key(&node_id), &node)?;

        let len = self.counter()?.checked_add(1).ok_or_else(|| {
            Error::Corrupted(format!("{} is at the integer limit", self.keys.len_key()))
        })?;
        self.store.set(self.keys.len_key(), &Value::Int(len))?;
        self.store
            .set(self.keys.head_key(), &Value::String(node_id.clone()))?;

        debug!(queue = %self.name, node = %node_id, len, "wrote node");
        Ok(true)
    }

    /// Pop the message at the head of the list
    ///
    /// Returns `Ok(None)` when the queue is empty.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if head points at a node that no longer exists.
    pub fn read(&mut self) -> Result<Option<Value>> {
        let node_id = match self.head()? {
            Some(id) => id,
            None => return Ok(None),
        };
        let node_key = self.keys.node_key(&node_id);
        let (payload, next) = self.load_node(&node_key)?;

        let len = self.counter()?;
        self.store
            .set(self.keys.len_key(), &Value::Int(len.saturating_sub(1).max(0)))?;
        self.store.delete(&node_key)?;
        self.store.set(self.keys.head_key(), &next)?;

        debug!(queue = %self.name, node = %node_id, "read node");
        Ok(Some(payload))
    }

    /// Number of messages in the queue
    pub fn length(&self) -> Result<u64> {
        Ok(u64::try_from(self.counter()?).unwrap_or(0))
    }

    /// Whether the queue holds no messages
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.length()? == 0)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The queue name
    pub fn name(&self) -> &QueueName {
        &self.name
    }

    /// The store this queue writes to
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Keys this queue uses
    pub fn keys(&self) -> &QueueKeys {
        &self.keys
    }

    /// Give back the store
    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // Entry decoding
    // ========================================================================

    /// Current head node id; absent or `Null` means empty
    fn head(&self) -> Result<Option<String>> {
        match self.optional(self.keys.head_key())? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(id)) => Ok(Some(id)),
            Some(other) => Err(Error::Corrupted(format!(
                "{} holds {} instead of a node id",
                self.keys.head_key(),
                other.type_name()
            ))),
        }
    }

    /// Stored length; absent means 0
    fn counter(&self) -> Result<i64> {
        match self.optional(self.keys.len_key())? {
            None => Ok(0),
            Some(Value::Int(n)) => Ok(n),
            Some(other) => Err(Error::Corrupted(format!(
                "{} holds {} instead of an integer",
                self.keys.len_key(),
                other.type_name()
            ))),
        }
    }

    fn load_node(&self, key: &str) -> Result<(Value, Value)> {
        let node = self.store.get(key)?;
        let malformed = |what: &str| Error::Corrupted(format!("node {} is {}", key, what));

        let mut parts = match node {
            Value::Array(parts) if parts.len() == 2 => parts,
            Value::Array(parts) => {
                return Err(malformed(&format!("an array of {} items", parts.len())))
            }
            other => return Err(malformed(other.type_name())),
        };
        let next = parts.pop().unwrap_or(Value::Null);
        let payload = parts.pop().unwrap_or(Value::Null);
        match next {
            Value::Null | Value::String(_) => Ok((payload, next)),
            other => Err(malformed(&format!("linked to {}", other.type_name()))),
        }
    }

    fn optional(&self, key: &str) -> Result<Option<Value>> {
        match self.store.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(Error::Store(e)),
        }
    }
}

impl<S: KeyValueStore> fmt::Display for LinkedListQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Queue {}>", self.name)
    }
}

impl<S: KeyValueStore> fmt::Debug for LinkedListQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedListQueue")
            .field("name", &self.name)
            .field("backend", &self.store.backend())
            .finish()
    }
}
