//! Core-spell pipeline shared by the CLI commands and the startup hook.
//!
//! fetch → ensure collection → scan → [`reconcile`] → [`apply`]
//!
//! The fetch and the permission check both happen before any write, so a
//! failure in either leaves the collection untouched. A failure inside
//! [`apply`] is not rolled back; the next run's hash comparison picks up
//! whatever did not converge.

use serde::Serialize;

use eq5e_core::{CollectionKey, Role};

use crate::reconcile::{reconcile, ReconcilePlan};
use crate::source::{fetch_records, SourceRef};
use crate::store::{CollectionProvisioner, DocumentStore, StoredRecord};
use crate::SyncError;

pub const DEFAULT_COLLECTION_KEY: &str = "world.eq5e-spells-core";
pub const DEFAULT_COLLECTION_LABEL: &str = "EQ5e Spells (Core)";

/// Parameters of a core-spell run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSpellsOptions {
    pub key: CollectionKey,
    pub label: String,
    pub source: SourceRef,
    /// Plan only; no collection is created and nothing is written.
    pub dry_run: bool,
}

impl Default for CoreSpellsOptions {
    fn default() -> Self {
        Self {
            key: CollectionKey::from(DEFAULT_COLLECTION_KEY),
            label: DEFAULT_COLLECTION_LABEL.to_string(),
            source: SourceRef::default(),
            dry_run: false,
        }
    }
}

/// Documents the store reported as written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub created: usize,
    pub updated: usize,
}

/// Outcome of a core-spell run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    pub collection: String,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub duplicates: usize,
    /// Planned writes the store did not report back as written.
    pub unmatched: usize,
    pub dry_run: bool,
}

impl UpsertSummary {
    /// Counts from the plan; `created`/`updated` start at the planned sizes
    /// and are overwritten with what the store reports after [`apply`].
    fn planned(key: &CollectionKey, plan: &ReconcilePlan, dry_run: bool) -> Self {
        Self {
            collection: key.0.clone(),
            created: plan.to_create.len(),
            updated: plan.to_update.len(),
            skipped: plan.skipped,
            ignored: plan.ignored,
            duplicates: plan.duplicates,
            unmatched: 0,
            dry_run,
        }
    }

    /// One-line user notification.
    pub fn message(&self) -> String {
        let verb = if self.dry_run { "would be upserted" } else { "upserted" };
        format!(
            "EQ5E: Core spells {verb}: created {}, updated {}, skipped {}.",
            self.created, self.updated, self.skipped
        )
    }
}

/// Execute a plan: one create batch, then one update batch.
///
/// Empty halves are not sent. Counts come from what the store returns, so
/// they can be lower than the plan if the store drops documents.
pub fn apply<S: DocumentStore + ?Sized>(
    store: &mut S,
    plan: ReconcilePlan,
) -> Result<ApplyReport, SyncError> {
    let mut report = ApplyReport::default();

    if !plan.to_create.is_empty() {
        let docs = store.create_batch(plan.to_create)?;
        report.created = docs.len();
        tracing::info!("created {} documents in {}", report.created, store.key());
    }
    if !plan.to_update.is_empty() {
        let docs = store.update_batch(plan.to_update)?;
        report.updated = docs.len();
        tracing::info!("updated {} documents in {}", report.updated, store.key());
    }

    Ok(report)
}

/// Plan the run without writing: fetch, scan the collection if it exists
/// (a missing one counts as empty), reconcile.
///
/// No collection is created, so this needs no privilege.
pub fn plan_core_spells<P: CollectionProvisioner>(
    provisioner: &P,
    options: &CoreSpellsOptions,
) -> Result<ReconcilePlan, SyncError> {
    plan_with_snapshot(provisioner, options).map(|(plan, _)| plan)
}

/// [`plan_core_spells`], also returning the stored documents it planned
/// against.
pub fn plan_with_snapshot<P: CollectionProvisioner>(
    provisioner: &P,
    options: &CoreSpellsOptions,
) -> Result<(ReconcilePlan, Vec<StoredRecord>), SyncError> {
    let items = fetch_records(&options.source)?;
    let existing = match provisioner.open(&options.key)? {
        Some(collection) => collection.query_all()?,
        None => {
            tracing::debug!("{} does not exist yet; planning against empty", options.key);
            Vec::new()
        }
    };
    let plan = reconcile(items, &existing);
    Ok((plan, existing))
}

/// Synchronize the core spell list into its world collection.
pub fn generate_core_spells<P: CollectionProvisioner>(
    provisioner: &mut P,
    role: Role,
    options: &CoreSpellsOptions,
) -> Result<UpsertSummary, SyncError> {
    if options.dry_run {
        let plan = plan_core_spells(provisioner, options)?;
        let summary = UpsertSummary::planned(&options.key, &plan, true);
        tracing::info!("[dry-run] {}", summary.message());
        return Ok(summary);
    }

    let items = fetch_records(&options.source)?;
    let mut collection = provisioner.ensure_collection(&options.key, &options.label, role)?;
    let existing = collection.query_all()?;
    let plan = reconcile(items, &existing);

    let mut summary = UpsertSummary::planned(&options.key, &plan, false);
    let report = apply(&mut collection, plan)?;
    summary.unmatched = (summary.created + summary.updated)
        .saturating_sub(report.created + report.updated);
    if summary.unmatched > 0 {
        tracing::warn!(
            "{} planned writes to {} were not applied by the store",
            summary.unmatched,
            options.key
        );
    }
    summary.created = report.created;
    summary.updated = report.updated;

    tracing::info!("{}", summary.message());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCollections;
    use serde_json::json;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_source(dir: &Path, items: serde_json::Value) -> SourceRef {
        let path = dir.join("spells-core.json");
        std::fs::write(&path, serde_json::to_string(&items).unwrap()).unwrap();
        SourceRef::Path(path)
    }

    fn spell(sid: &str, power: i64) -> serde_json::Value {
        json!({ "name": sid, "power": power, "flags": { "eq5e": { "spell": { "spellId": sid } } } })
    }

    #[test]
    fn first_run_creates_collection_and_documents() {
        let dir = TempDir::new().unwrap();
        let options = CoreSpellsOptions {
            source: write_source(dir.path(), json!([spell("SPL001", 1), spell("SPL002", 2)])),
            ..CoreSpellsOptions::default()
        };
        let mut cols = MemoryCollections::new();
        let summary = generate_core_spells(&mut cols, Role::Gm, &options).unwrap();
        assert_eq!((summary.created, summary.updated, summary.skipped), (2, 0, 0));
        assert_eq!(cols.documents(&options.key).len(), 2);
        assert_eq!(
            cols.label(&options.key).as_deref(),
            Some(DEFAULT_COLLECTION_LABEL)
        );
    }

    #[test]
    fn dry_run_writes_nothing_and_creates_no_collection() {
        let dir = TempDir::new().unwrap();
        let options = CoreSpellsOptions {
            source: write_source(dir.path(), json!([spell("SPL001", 1)])),
            dry_run: true,
            ..CoreSpellsOptions::default()
        };
        let mut cols = MemoryCollections::new();
        let summary = generate_core_spells(&mut cols, Role::Player, &options).unwrap();
        assert!(summary.dry_run);
        assert_eq!(summary.created, 1);
        assert!(!cols.contains(&options.key));
        assert!(summary.message().contains("would be upserted"));
    }

    #[test]
    fn apply_skips_empty_batches() {
        let mut cols = MemoryCollections::new();
        let key = CollectionKey::from(DEFAULT_COLLECTION_KEY);
        let mut handle = cols.ensure_collection(&key, "Spells", Role::Gm).unwrap();
        cols.reject_creates(true);
        cols.reject_updates(true);
        let report = apply(&mut handle, ReconcilePlan::default()).unwrap();
        assert_eq!(report, ApplyReport::default());
    }

    /// Memory store whose update batches write nothing.
    struct DroppingCollections(MemoryCollections);

    struct DroppingCollection(crate::memory::MemoryCollection);

    impl DocumentStore for DroppingCollection {
        fn key(&self) -> &CollectionKey {
            self.0.key()
        }

        fn query_all(&self) -> Result<Vec<StoredRecord>, SyncError> {
            self.0.query_all()
        }

        fn create_batch(
            &mut self,
            docs: Vec<serde_json::Value>,
        ) -> Result<Vec<StoredRecord>, SyncError> {
            self.0.create_batch(docs)
        }

        fn update_batch(
            &mut self,
            _updates: Vec<(eq5e_core::DocumentId, serde_json::Value)>,
        ) -> Result<Vec<StoredRecord>, SyncError> {
            Ok(Vec::new())
        }
    }

    impl CollectionProvisioner for DroppingCollections {
        type Collection = DroppingCollection;

        fn open(&self, key: &CollectionKey) -> Result<Option<DroppingCollection>, SyncError> {
            Ok(self.0.open(key)?.map(DroppingCollection))
        }

        fn ensure_collection(
            &mut self,
            key: &CollectionKey,
            label: &str,
            role: Role,
        ) -> Result<DroppingCollection, SyncError> {
            self.0.ensure_collection(key, label, role).map(DroppingCollection)
        }
    }

    #[test]
    fn updates_the_store_drops_are_reported_as_unmatched() {
        let dir = TempDir::new().unwrap();
        let mut options = CoreSpellsOptions {
            source: write_source(dir.path(), json!([spell("SPL001", 5)])),
            ..CoreSpellsOptions::default()
        };
        let mut cols = DroppingCollections(MemoryCollections::new());
        generate_core_spells(&mut cols, Role::Gm, &options).unwrap();

        options.source = write_source(dir.path(), json!([spell("SPL001", 9)]));
        let summary = generate_core_spells(&mut cols, Role::Gm, &options).unwrap();
        assert_eq!((summary.updated, summary.unmatched), (0, 1));
    }

    #[test]
    fn snapshot_is_what_the_plan_was_built_against() {
        let dir = TempDir::new().unwrap();
        let options = CoreSpellsOptions {
            source: write_source(dir.path(), json!([spell("SPL001", 9)])),
            ..CoreSpellsOptions::default()
        };
        let mut cols = MemoryCollections::new();
        let mut handle = cols.ensure_collection(&options.key, "Spells", Role::Gm).unwrap();
        let stored = handle.create_batch(vec![spell("SPL001", 5)]).unwrap();

        let (plan, existing) = plan_with_snapshot(&cols, &options).unwrap();
        assert_eq!(existing, stored);
        assert_eq!(plan.to_update[0].0, stored[0].id);
    }

    #[test]
    fn summary_message_lists_counts() {
        let summary = UpsertSummary {
            collection: DEFAULT_COLLECTION_KEY.to_string(),
            created: 2,
            updated: 1,
            skipped: 7,
            ignored: 0,
            duplicates: 0,
            unmatched: 0,
            dry_run: false,
        };
        assert_eq!(
            summary.message(),
            "EQ5E: Core spells upserted: created 2, updated 1, skipped 7."
        );
    }
}
