//! Backend Test Suite
//!
//! Configuration, backend selection and the optional admin operations.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test backends
//! ```

use kvqueue::{BackendKind, Error, Queues, StoreConfig};
use kvqueue_wire::testing::MemcacheServer;
use tempfile::TempDir;

// Test modules
pub mod admin;
pub mod config;
pub mod memcached;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Connection string naming every server
pub fn connection(servers: &[&MemcacheServer]) -> String {
    servers
        .iter()
        .map(|s| s.addr())
        .collect::<Vec<_>>()
        .join(";")
}

/// Queues over fresh fake servers
pub fn memcached(n: usize) -> (Vec<MemcacheServer>, Queues) {
    let servers: Vec<MemcacheServer> = (0..n)
        .map(|_| MemcacheServer::start().expect("fake memcached"))
        .collect();
    let refs: Vec<&MemcacheServer> = servers.iter().collect();
    let queues = Queues::builder()
        .memcached(connection(&refs))
        .open()
        .expect("memcached backend");
    (servers, queues)
}
