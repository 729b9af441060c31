//! Queue Semantics Test Suite
//!
//! Every behavior of `LinkedListQueue` is checked against each backend:
//! memory, a spool directory, and memcached (an in-process fake server
//! speaking the text protocol).
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test queue_semantics
//!
//! # Ordering tests only
//! cargo test --test queue_semantics ordering::
//! ```

use kvqueue::{BackendKind, MemoryStore, Queue, Queues, StoreFactory, Value};
use kvqueue_wire::testing::MemcacheServer;
use tempfile::TempDir;

// Test modules
pub mod faults;
pub mod fidelity;
pub mod laws;
pub mod length;
pub mod ordering;
pub mod scenario;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// What keeps a backend alive, and lets tests look at its raw entries
pub enum Backing {
    Memory(MemoryStore),
    Spool(TempDir),
    Server(MemcacheServer),
}

/// A backend plus its backing
pub struct Fixture {
    pub queues: Queues,
    pub backing: Backing,
}

impl Fixture {
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        let queues = Queues::from_factory(StoreFactory::with_memory(store.clone()))
            .expect("memory backend");
        Fixture {
            queues,
            backing: Backing::Memory(store),
        }
    }

    pub fn file() -> Self {
        let spool = TempDir::new().expect("temp spool");
        let queues = Queues::builder()
            .filebased(spool.path())
            .open()
            .expect("file backend");
        Fixture {
            queues,
            backing: Backing::Spool(spool),
        }
    }

    pub fn memcached() -> Self {
        let server = MemcacheServer::start().expect("fake memcached");
        let queues = Queues::builder()
            .memcached(server.addr())
            .open()
            .expect("memcached backend");
        Fixture {
            queues,
            backing: Backing::Server(server),
        }
    }

    pub fn backend(&self) -> BackendKind {
        self.queues.backend()
    }

    pub fn queue(&self, name: &str) -> Queue {
        self.queues.queue(name).expect("queue construction")
    }

    /// Raw keys stored under `prefix`
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        match &self.backing {
            Backing::Memory(store) => store.keys_with_prefix(prefix),
            Backing::Server(server) => server.keys_with_prefix(prefix),
            Backing::Spool(dir) => {
                let mut keys: Vec<String> = std::fs::read_dir(dir.path())
                    .expect("read spool")
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .filter(|name| name.starts_with(prefix))
                    .collect();
                keys.sort();
                keys
            }
        }
    }

    /// Node entries currently stored for `queue`
    pub fn node_count(&self, queue: &str) -> usize {
        self.keys_with_prefix(&format!("kvq.{}.node.", queue)).len()
    }
}

/// One fixture per backend
pub fn all_backends() -> Vec<Fixture> {
    vec![Fixture::memory(), Fixture::file(), Fixture::memcached()]
}

/// Read until empty, returning everything read
pub fn drain(queue: &mut Queue) -> Vec<Value> {
    let mut out = Vec::new();
    while let Some(v) = queue.read().expect("read") {
        out.push(v);
    }
    out
}
