//! Error types for kvqueue
//!
//! Two layers:
//! - [`StoreError`]: what a single `set`/`get`/`delete` on a backend reports.
//! - [`Error`]: what configuration, queue construction and queue operations
//!   report to callers.
//!
//! ## Propagation
//!
//! Queue operations propagate store faults as [`Error::Store`] regardless of
//! the configured backend. A missing metadata key is never an error: the
//! queue treats an absent head as empty and an absent counter as zero.
//! After a fault in the middle of `write` or `read` the queue state is
//! unknown and should be re-verified by the caller.

use thiserror::Error;

/// Result type for single store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for kvqueue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of one key-value store primitive
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key does not exist in the store
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The key cannot be represented by this backend
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// Local I/O failed while touching a key
    #[error("I/O error on {key}: {source}")]
    Io {
        /// The key being accessed
        key: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Could not reach or talk to a remote server
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with an error or an unexpected response
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A stored value could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Check if this is a missing-key error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::KeyNotFound(_))
    }
}

/// All kvqueue errors
#[derive(Debug, Error)]
pub enum Error {
    /// Backend configuration is missing or unusable
    #[error("invalid backend: {0}")]
    InvalidBackend(String),

    /// The store could not be reached while constructing a queue
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A non-metadata entry (a queue node) is missing
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A store primitive failed mid-operation
    #[error("store error: {0}")]
    Store(StoreError),

    /// The backend does not support this operation
    #[error("not implemented by this backend: {0}")]
    NotImplemented(&'static str),

    /// Queue name rejected by key namespacing rules
    #[error("invalid queue name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A stored entry does not have the expected shape
    #[error("corrupted entry: {0}")]
    Corrupted(String),
}

impl Error {
    /// Check if retrying the whole operation may succeed.
    ///
    /// Connection, I/O and protocol faults are retryable; malformed data and
    /// configuration problems are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::BackendUnavailable(_) => true,
            Error::Store(e) => matches!(
                e,
                StoreError::Io { .. } | StoreError::Connection(_) | StoreError::Protocol(_)
            ),
            _ => false,
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound(_))
    }

    /// Check if this is a missing-capability error
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented(_))
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::KeyNotFound(key) => Error::KeyNotFound(key),
            other => Error::Store(other),
        }
    }
}
