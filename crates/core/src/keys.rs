//! Key layout for queues stored in a key-value store
//!
//! Every queue owns a reserved namespace:
//!
//! | Entry | Key |
//! |-------|-----|
//! | head  | `kvq.{name}.head` |
//! | len   | `kvq.{name}.len` |
//! | node  | `kvq.{name}.node.{node_id}` |
//!
//! `.` is the separator and is rejected in queue names, so the metadata and
//! node keys of two different queues can never collide. Every generated key
//! is also a legal memcached key and a legal file name.

use crate::error::{Error, Result};
use std::fmt;
use uuid::Uuid;

/// Prefix shared by every key kvqueue writes
pub const KEY_PREFIX: &str = "kvq";

/// Maximum queue name length in bytes
pub const MAX_NAME_LEN: usize = 200;

const SEPARATOR: char = '.';

/// A validated queue name
///
/// Names are non-empty, at most [`MAX_NAME_LEN`] bytes, and contain only
/// ASCII alphanumerics, `_` and `-`.
///
/// # Examples
///
/// ```
/// use kvqueue_core::keys::QueueName;
///
/// assert!(QueueName::new("jobs_2024").is_ok());
/// assert!(QueueName::new("jobs.head").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueName(String);

impl QueueName {
    /// Validate and wrap a queue name
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let reject = |reason: String| Error::InvalidName {
            name: name.clone(),
            reason,
        };

        if name.is_empty() {
            return Err(reject("name is empty".to_string()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(reject(format!(
                "name is {} bytes, limit is {}",
                name.len(),
                MAX_NAME_LEN
            )));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(reject(format!("character {:?} is not allowed", c)));
        }

        Ok(QueueName(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueueName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for QueueName {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        QueueName::new(name)
    }
}

impl std::str::FromStr for QueueName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        QueueName::new(s)
    }
}

/// Identifier of a queue node
///
/// A UUIDv7: time-ordered and never reused. Stored in head pointers and
/// `next` links in its hyphenated string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh node id
    pub fn new() -> Self {
        NodeId(Uuid::now_v7())
    }

    /// Parse a node id from its string form
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(NodeId)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Precomputed keys for one queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueKeys {
    head: String,
    len: String,
    node_prefix: String,
}

impl QueueKeys {
    /// Derive the key set for a queue
    pub fn new(name: &QueueName) -> Self {
        let base = format!("{KEY_PREFIX}{SEPARATOR}{name}{SEPARATOR}");
        QueueKeys {
            head: format!("{base}head"),
            len: format!("{base}len"),
            node_prefix: format!("{base}node{SEPARATOR}"),
        }
    }

    /// Key holding the head node id (or null)
    pub fn head_key(&self) -> &str {
        &self.head
    }

    /// Key holding the node counter
    pub fn len_key(&self) -> &str {
        &self.len
    }

    /// Prefix shared by all node keys of this queue
    pub fn node_prefix(&self) -> &str {
        &self.node_prefix
    }

    /// Key holding the node with the given id
    pub fn node_key(&self, node_id: &str) -> String {
        format!("{}{}", self.node_prefix, node_id)
    }
}
