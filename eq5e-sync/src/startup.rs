//! World-ready hook: import core spells automatically when allowed.
//!
//! Gates, in order:
//! 1. caller is not GM → nothing happens
//! 2. `core_spells_on_startup` is off → nothing happens
//! 3. run the pipeline; success and failure are both reported through the
//!    [`Notifier`], never returned as an error

use eq5e_core::{Role, Settings};

use crate::notify::Notifier;
use crate::pipeline::{generate_core_spells, CoreSpellsOptions, UpsertSummary};
use crate::store::CollectionProvisioner;

pub const FAILURE_MESSAGE: &str = "EQ5E: Failed to generate core spells compendium (see log).";

/// What the startup hook did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    NotGm,
    Disabled,
    Completed(UpsertSummary),
    Failed { error: String },
}

pub fn on_ready<P: CollectionProvisioner>(
    settings: &Settings,
    role: Role,
    provisioner: &mut P,
    options: &CoreSpellsOptions,
    notifier: &dyn Notifier,
) -> StartupOutcome {
    if !role.is_gm() {
        tracing::debug!("startup import skipped: caller is not GM");
        return StartupOutcome::NotGm;
    }
    if !settings.core_spells_on_startup {
        tracing::debug!("startup import skipped: core_spells_on_startup is disabled");
        return StartupOutcome::Disabled;
    }

    match generate_core_spells(provisioner, role, options) {
        Ok(summary) => {
            notifier.info(&summary.message());
            StartupOutcome::Completed(summary)
        }
        Err(err) => {
            tracing::error!("failed to generate core spells compendium: {err}");
            notifier.error(FAILURE_MESSAGE);
            StartupOutcome::Failed {
                error: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCollections;
    use crate::notify::{Level, RecordingNotifier};
    use crate::source::SourceRef;
    use serde_json::json;
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> CoreSpellsOptions {
        let path = dir.path().join("spells-core.json");
        std::fs::write(
            &path,
            json!([{ "name": "Gate", "flags": { "eq5e": { "spell": { "spellId": "SPL010" } } } }])
                .to_string(),
        )
        .unwrap();
        CoreSpellsOptions {
            source: SourceRef::Path(path),
            ..CoreSpellsOptions::default()
        }
    }

    #[test]
    fn players_never_trigger_import() {
        let dir = TempDir::new().unwrap();
        let mut cols = MemoryCollections::new();
        let notifier = RecordingNotifier::new();
        let outcome = on_ready(
            &Settings::default(),
            Role::Player,
            &mut cols,
            &options(&dir),
            &notifier,
        );
        assert_eq!(outcome, StartupOutcome::NotGm);
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn disabled_setting_skips_import() {
        let dir = TempDir::new().unwrap();
        let mut cols = MemoryCollections::new();
        let notifier = RecordingNotifier::new();
        let settings = Settings {
            core_spells_on_startup: false,
            ..Settings::default()
        };
        let outcome = on_ready(&settings, Role::Gm, &mut cols, &options(&dir), &notifier);
        assert_eq!(outcome, StartupOutcome::Disabled);
        assert!(!cols.contains(&options(&dir).key));
    }

    #[test]
    fn gm_with_default_settings_imports_and_notifies() {
        let dir = TempDir::new().unwrap();
        let mut cols = MemoryCollections::new();
        let notifier = RecordingNotifier::new();
        let outcome = on_ready(
            &Settings::default(),
            Role::Gm,
            &mut cols,
            &options(&dir),
            &notifier,
        );
        assert!(matches!(outcome, StartupOutcome::Completed(ref s) if s.created == 1));
        assert_eq!(
            notifier.messages(),
            vec![(
                Level::Info,
                "EQ5E: Core spells upserted: created 1, updated 0, skipped 0.".to_string()
            )]
        );
    }

    #[test]
    fn failure_is_reported_not_returned() {
        let dir = TempDir::new().unwrap();
        let mut cols = MemoryCollections::new();
        let notifier = RecordingNotifier::new();
        let opts = CoreSpellsOptions {
            source: SourceRef::Path(dir.path().join("missing.json")),
            ..CoreSpellsOptions::default()
        };
        let outcome = on_ready(&Settings::default(), Role::Gm, &mut cols, &opts, &notifier);
        match outcome {
            StartupOutcome::Failed { error } => assert!(error.contains("source unavailable")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(
            notifier.messages(),
            vec![(Level::Error, FAILURE_MESSAGE.to_string())]
        );
    }
}
