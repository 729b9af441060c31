//! Value codec
//!
//! Every backend persists a [`Value`] as:
//!
//! ```text
//! +---------+------------------------------+
//! | version | MessagePack encoding (rmp)   |
//! | 1 byte  | variable                     |
//! +---------+------------------------------+
//! ```
//!
//! The version byte lets the encoding change without misreading old
//! entries. Decoding rejects unknown versions instead of guessing.

use kvqueue_core::{StoreError, StoreResult, Value};

/// Current value format version
pub const FORMAT_VERSION: u8 = 1;

/// Encode a value for storage
pub fn encode_value(value: &Value) -> StoreResult<Vec<u8>> {
    let mut buf = vec![FORMAT_VERSION];
    rmp_serde::encode::write(&mut buf, value)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

/// Decode a stored value
pub fn decode_value(bytes: &[u8]) -> StoreResult<Value> {
    match bytes.split_first() {
        Some((&FORMAT_VERSION, body)) => {
            rmp_serde::from_slice(body).map_err(|e| StoreError::Serialization(e.to_string()))
        }
        Some((version, _)) => Err(StoreError::Serialization(format!(
            "unsupported value format version {}",
            version
        ))),
        None => Err(StoreError::Serialization("empty value payload".to_string())),
    }
}
