//! In-memory store
//!
//! A DashMap of encoded values. Clones share the same map, so several queue
//! handles opened from one factory see the same data. Nothing touches disk
//! and everything is lost when the last clone is dropped.
//!
//! Values go through the same codec as the other backends, so round-trip
//! behavior is identical everywhere.

use dashmap::DashMap;
use kvqueue_core::{BackendKind, KeyValueStore, StoreError, StoreResult, Value};
use kvqueue_wire::{decode_value, encode_value};
use std::sync::Arc;

/// Process-local key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored keys starting with `prefix`, sorted
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let bytes = encode_value(value)?;
        self.entries.insert(key.to_string(), bytes);
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Value> {
        let bytes = self
            .entries
            .get(key)
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))?;
        decode_value(bytes.value())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }
}
