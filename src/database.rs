//! Main entry point for kvqueue.
//!
//! This module provides the `Queues` struct, which holds a validated backend
//! configuration and hands out queues on it.

use crate::error::Result;
use kvqueue_core::{BackendKind, Capabilities, KeyValueStore, QueueName};
use kvqueue_primitives::LinkedListQueue;
use kvqueue_storage::{StoreConfig, StoreFactory};
use std::path::Path;
use tracing::info;

/// A queue over a boxed store handle, as returned by [`Queues::queue`].
pub type Queue = LinkedListQueue<Box<dyn KeyValueStore>>;

/// Access to the queues of one backend.
///
/// Create it with [`Queues::open`], [`Queues::from_env`], [`Queues::builder`]
/// or [`Queues::ephemeral`]. The configuration is validated up front, so a
/// missing connection string or spool directory is reported here as
/// [`Error::InvalidBackend`](crate::Error::InvalidBackend) and not on first use.
///
/// # Example
///
/// ```
/// use kvqueue::prelude::*;
///
/// let queues = Queues::ephemeral()?;
/// let mut jobs = queues.queue("jobs")?;
/// jobs.write("resize image 42")?;
/// assert_eq!(jobs.read()?, Some(Value::from("resize image 42")));
/// # Ok::<(), kvqueue::Error>(())
/// ```
pub struct Queues {
    factory: StoreFactory,
    admin: Box<dyn KeyValueStore>,
}

impl Queues {
    /// Open queues on the backend described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::from_factory(StoreFactory::new(config)?)
    }

    /// Open queues on the stores `factory` creates.
    pub fn from_factory(factory: StoreFactory) -> Result<Self> {
        let admin = factory.open()?;
        info!(backend = %factory.backend(), "Queues opened");
        Ok(Queues { factory, admin })
    }

    /// Open queues on the backend described by the `QUEUE_*` environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        Self::open(&StoreConfig::from_env()?)
    }

    /// Open queues on a process-local store.
    ///
    /// Nothing is persisted; every queue handed out shares the same map and
    /// everything is gone once the last handle is dropped.
    pub fn ephemeral() -> Result<Self> {
        Self::open(&StoreConfig::memory())
    }

    /// Create a builder for backend configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// let queues = kvqueue::Queues::builder()
    ///     .memcached("10.0.0.1:22122;10.0.0.2:22122")
    ///     .io_timeout_ms(500)
    ///     .open()?;
    /// # Ok::<(), kvqueue::Error>(())
    /// ```
    pub fn builder() -> QueuesBuilder {
        QueuesBuilder::new()
    }

    /// Construct the queue `name` on a fresh store handle.
    ///
    /// Construction is destructive: anything previously stored under the
    /// name is abandoned and the queue starts empty.
    pub fn queue(&self, name: &str) -> Result<Queue> {
        let name = QueueName::new(name)?;
        LinkedListQueue::with_name(self.factory.open()?, name)
    }

    /// The backend in use.
    pub fn backend(&self) -> BackendKind {
        self.factory.backend()
    }

    /// Optional operations the backend supports.
    pub fn capabilities(&self) -> Capabilities {
        self.admin.capabilities()
    }

    /// Create a queue ahead of use. Always succeeds.
    pub fn create_queue(&self) -> Result<bool> {
        self.admin.create_queue()
    }

    /// Names of the queues the backend reports.
    ///
    /// Only the memcached backend implements this; the others fail with
    /// [`Error::NotImplemented`](crate::Error::NotImplemented).
    pub fn list_queues(&self) -> Result<Vec<String>> {
        self.admin.list_queues()
    }

    /// Drop a queue. No backend implements this.
    pub fn delete_queue(&self, name: &str) -> Result<()> {
        self.admin.delete_queue(&QueueName::new(name)?)
    }
}

impl std::fmt::Debug for Queues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queues")
            .field("backend", &self.backend())
            .finish()
    }
}

/// Builder for backend configuration.
///
/// # Example
///
/// ```no_run
/// use kvqueue::Queues;
///
/// // Shared memcached-protocol servers
/// let queues = Queues::builder().memcached("127.0.0.1:11211").open()?;
///
/// // Spool directory on local disk
/// let queues = Queues::builder().filebased("/var/spool/kvqueue").open()?;
///
/// // Process-local, for tests
/// let queues = Queues::builder().memory().open()?;
/// # Ok::<(), kvqueue::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueuesBuilder {
    config: StoreConfig,
}

impl QueuesBuilder {
    /// Create a builder with no backend selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Use memcached-protocol servers, given as `host:port` separated by `;`.
    pub fn memcached(mut self, connection: impl Into<String>) -> Self {
        self.config.backend = Some(BackendKind::Memcached);
        self.config.memcache_connection = Some(connection.into());
        self
    }

    /// Use a spool directory. It must already exist.
    pub fn filebased(mut self, spool: impl AsRef<Path>) -> Self {
        self.config.backend = Some(BackendKind::FileBased);
        self.config.filebased_spool = Some(spool.as_ref().to_path_buf());
        self
    }

    /// Use a process-local store.
    pub fn memory(mut self) -> Self {
        self.config.backend = Some(BackendKind::Memory);
        self
    }

    /// TCP connect timeout for memcached.
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Read/write timeout for memcached.
    pub fn io_timeout_ms(mut self, ms: u64) -> Self {
        self.config.io_timeout_ms = ms;
        self
    }

    /// The configuration built so far.
    pub fn as_config(&self) -> &StoreConfig {
        &self.config
    }

    /// Validate the configuration and open.
    pub fn open(self) -> Result<Queues> {
        Queues::open(&self.config)
    }
}
