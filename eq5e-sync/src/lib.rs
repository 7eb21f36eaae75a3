//! # eq5e-sync
//!
//! Hash-gated upsert of the core spell list into a world collection.
//!
//! [`reconcile`] plans the minimal create/update set; [`pipeline::apply`]
//! executes it against a [`DocumentStore`]. Call [`generate_core_spells`] to
//! run the whole fetch → plan → apply sequence, or [`startup::on_ready`] for
//! the settings-gated automatic import.

pub mod collection;
pub mod diff;
pub mod error;
pub mod hash;
pub mod memory;
pub mod merge;
pub mod notify;
pub mod pipeline;
pub mod reconcile;
pub mod source;
pub mod startup;
pub mod store;

pub use collection::{FileCollection, FileCollections};
pub use diff::{diff_core_spells, ChangeKind, DiffCollectionResult, RecordDiff};
pub use error::SyncError;
pub use memory::{MemoryCollection, MemoryCollections};
pub use notify::Notifier;
pub use pipeline::{apply, generate_core_spells, ApplyReport, CoreSpellsOptions, UpsertSummary};
pub use reconcile::{reconcile, ReconcilePlan};
pub use source::SourceRef;
pub use startup::{on_ready, StartupOutcome};
pub use store::{CollectionProvisioner, DocumentStore, StoredRecord};
