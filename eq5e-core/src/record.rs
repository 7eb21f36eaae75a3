//! Reserved metadata inside spell document payloads.
//!
//! ```text
//! flags.eq5e.spell.spellId   stable identifier (input)
//! flags.eq5e.derivedHash     content hash (stamped by the reconciler)
//! ```

use serde_json::{Map, Value};

use crate::types::SpellId;

/// Flag namespace owned by the EQ5e system.
pub const FLAG_SCOPE: &str = "eq5e";
/// Key of the content hash under `flags.eq5e`.
pub const DERIVED_HASH_KEY: &str = "derivedHash";

/// Read `flags.eq5e.spell.spellId`.
///
/// Only a non-empty string counts; numbers, `null` and `""` are treated as
/// absent.
pub fn spell_id(doc: &Value) -> Option<SpellId> {
    doc.pointer("/flags/eq5e/spell/spellId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(SpellId::from)
}

/// Read `flags.eq5e.derivedHash`.
pub fn derived_hash(doc: &Value) -> Option<&str> {
    doc.pointer("/flags/eq5e/derivedHash").and_then(Value::as_str)
}

/// Stamp `flags.eq5e.derivedHash`, creating intermediate objects as needed.
///
/// A non-object `flags` or `flags.eq5e` is replaced by an object. A
/// non-object `doc` is left untouched.
pub fn set_derived_hash(doc: &mut Value, hash: &str) {
    let scope = doc
        .as_object_mut()
        .and_then(|root| child_object(root, "flags"))
        .and_then(|flags| child_object(flags, FLAG_SCOPE));
    if let Some(scope) = scope {
        scope.insert(DERIVED_HASH_KEY.to_string(), Value::String(hash.to_string()));
    }
}

/// Copy of `doc` with `flags.eq5e.derivedHash` removed.
pub fn without_derived_hash(doc: &Value) -> Value {
    let mut copy = doc.clone();
    if let Some(scope) = copy
        .pointer_mut("/flags/eq5e")
        .and_then(Value::as_object_mut)
    {
        scope.remove(DERIVED_HASH_KEY);
    }
    copy
}

fn child_object<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut()
}
