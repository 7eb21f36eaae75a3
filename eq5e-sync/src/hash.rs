//! Content hash used to detect no-op updates.
//!
//! The digest is SHA-256 over the compact `serde_json` serialization of the
//! record with `flags.eq5e.derivedHash` removed. `serde_json::Map` keeps keys
//! sorted, so two payloads that differ only in key order hash identically;
//! array order is significant.

use serde_json::Value;
use sha2::{Digest, Sha256};

use eq5e_core::record;

/// Lowercase hex SHA-256 of the record payload, excluding its own hash field.
pub fn content_hash(doc: &Value) -> String {
    let payload = record::without_derived_hash(doc);
    let mut h = Sha256::new();
    // Serializing a `Value` to a Vec cannot fail: keys are always strings.
    let bytes = serde_json::to_vec(&payload).unwrap_or_default();
    h.update(&bytes);
    hex::encode(h.finalize())
}
