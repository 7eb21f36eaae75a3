//! Dry-run unified diff support for `eq5e spells diff`.

use std::collections::HashMap;

use serde_json::Value;
use similar::TextDiff;

use eq5e_core::{record, DocumentId};

use crate::pipeline::{plan_with_snapshot, CoreSpellsOptions};
use crate::reconcile::ReconcilePlan;
use crate::store::{CollectionProvisioner, StoredRecord};
use crate::SyncError;

/// What the apply step would do to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Update { id: DocumentId },
}

/// A single document diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDiff {
    /// `spellId` of the record, or `?` if it somehow has none.
    pub spell_id: String,
    pub kind: ChangeKind,
    pub unified_diff: String,
}

/// Diff result for a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffCollectionResult {
    pub collection: String,
    pub diffs: Vec<RecordDiff>,
    pub skipped: usize,
}

/// Compare what sync would write against what the collection currently holds.
///
/// Nothing is created or written; a missing collection diffs as empty.
pub fn diff_core_spells<P: CollectionProvisioner>(
    provisioner: &P,
    options: &CoreSpellsOptions,
) -> Result<DiffCollectionResult, SyncError> {
    let (plan, existing) = plan_with_snapshot(provisioner, options)?;

    Ok(DiffCollectionResult {
        collection: options.key.0.clone(),
        diffs: diff_plan(&plan, &existing),
        skipped: plan.skipped,
    })
}

/// Render every planned write as a unified diff of pretty-printed JSON.
pub fn diff_plan(plan: &ReconcilePlan, existing: &[StoredRecord]) -> Vec<RecordDiff> {
    let by_id: HashMap<&DocumentId, &StoredRecord> = existing.iter().map(|r| (&r.id, r)).collect();
    let mut diffs = Vec::with_capacity(plan.to_create.len() + plan.to_update.len());

    for doc in &plan.to_create {
        let sid = label_for(doc);
        diffs.push(RecordDiff {
            unified_diff: unified(&sid, "", &pretty(doc)),
            spell_id: sid,
            kind: ChangeKind::Create,
        });
    }

    for (id, doc) in &plan.to_update {
        let sid = label_for(doc);
        let before = by_id.get(id).map(|r| pretty(&r.payload)).unwrap_or_default();
        diffs.push(RecordDiff {
            unified_diff: unified(&sid, &before, &pretty(doc)),
            spell_id: sid,
            kind: ChangeKind::Update { id: id.clone() },
        });
    }

    diffs
}

fn label_for(doc: &Value) -> String {
    record::spell_id(doc)
        .map(|s| s.0)
        .unwrap_or_else(|| "?".to_string())
}

fn pretty(doc: &Value) -> String {
    let mut out = serde_json::to_string_pretty(doc).unwrap_or_default();
    out.push('\n');
    out
}

fn unified(spell_id: &str, before: &str, after: &str) -> String {
    let old_header = format!("a/{spell_id}");
    let new_header = format!("b/{spell_id}");
    TextDiff::from_lines(before, after)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}
