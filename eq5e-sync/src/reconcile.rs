//! Upsert planning by `spellId` and content hash.
//!
//! [`reconcile`] is pure: it compares the desired records with a snapshot of
//! the stored ones and returns the minimal write set. [`crate::pipeline::apply`]
//! executes it.
//!
//! Per desired record with a usable `spellId`:
//!
//! 1. Hash the payload (own `derivedHash` excluded).
//! 2. No stored document for the id → stamp the hash, create.
//! 3. Stored hash differs → deep-merge incoming over stored, stamp, update.
//! 4. Stored hash equal → skip.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use eq5e_core::{record, DocumentId, SpellId};

use crate::hash::content_hash;
use crate::merge::merged;
use crate::store::StoredRecord;

/// Writes needed to converge a collection onto the desired set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// New documents, hash already stamped.
    pub to_create: Vec<Value>,
    /// `(stored id, merged payload)`, hash already stamped.
    pub to_update: Vec<(DocumentId, Value)>,
    /// Records whose stored hash already matched.
    pub skipped: usize,
    /// Records without a usable `spellId`.
    pub ignored: usize,
    /// Later repeats of a `spellId` already seen in this desired set.
    pub duplicates: usize,
}

impl ReconcilePlan {
    /// True when applying the plan would write nothing.
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Plan the create/update delta between `desired` and `existing`.
///
/// Stored documents sharing a `spellId` are not deduplicated; the last one
/// scanned is the one compared against. Within `desired`, the first record
/// for a `spellId` wins and later repeats are counted in
/// [`ReconcilePlan::duplicates`].
pub fn reconcile(desired: Vec<Value>, existing: &[StoredRecord]) -> ReconcilePlan {
    let mut by_spell_id: HashMap<SpellId, &StoredRecord> = HashMap::new();
    for doc in existing {
        if let Some(sid) = doc.spell_id() {
            by_spell_id.insert(sid, doc);
        }
    }

    let mut plan = ReconcilePlan::default();
    let mut seen: HashSet<SpellId> = HashSet::new();

    for mut item in desired {
        let Some(sid) = record::spell_id(&item) else {
            plan.ignored += 1;
            continue;
        };
        if !seen.insert(sid.clone()) {
            tracing::warn!("duplicate spellId {sid} in source; keeping the first occurrence");
            plan.duplicates += 1;
            continue;
        }

        let hash = content_hash(&item);
        match by_spell_id.get(&sid) {
            None => {
                record::set_derived_hash(&mut item, &hash);
                tracing::debug!("create: {sid}");
                plan.to_create.push(item);
            }
            Some(doc) if doc.derived_hash() != Some(hash.as_str()) => {
                let mut upd = merged(&doc.payload, &item);
                record::set_derived_hash(&mut upd, &hash);
                tracing::debug!("update: {sid} ({})", doc.id);
                plan.to_update.push((doc.id.clone(), upd));
            }
            Some(_) => {
                tracing::debug!("unchanged: {sid}");
                plan.skipped += 1;
            }
        }
    }

    plan
}
