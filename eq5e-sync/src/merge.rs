//! Deep merge applied when an existing document is updated.
//!
//! Policy:
//! - object into object: merge key by key, recursively
//! - anything else: the incoming value replaces the target (arrays included)
//! - incoming `null` overwrites; it never deletes a key

use serde_json::Value;

/// Merge `incoming` into `target` in place.
pub fn deep_merge(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match target_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, incoming) => *target = incoming.clone(),
    }
}

/// Non-mutating form of [`deep_merge`].
pub fn merged(base: &Value, incoming: &Value) -> Value {
    let mut out = base.clone();
    deep_merge(&mut out, incoming);
    out
}
