pub mod settings;
pub mod sheet;
pub mod spells;
pub mod startup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use eq5e_core::CollectionKey;
use eq5e_sync::{
    pipeline::{DEFAULT_COLLECTION_KEY, DEFAULT_COLLECTION_LABEL},
    source::DEFAULT_SOURCE,
    CoreSpellsOptions, SourceRef,
};

pub(crate) fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

/// Where the spells come from and which pack they go into.
#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Spell list to import: a local JSON file or an http(s) URL.
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub source: SourceRef,

    /// Target pack key, `<package>.<name>`.
    #[arg(long, default_value = DEFAULT_COLLECTION_KEY)]
    pub key: String,
}

impl PackArgs {
    pub fn options(&self) -> CoreSpellsOptions {
        CoreSpellsOptions {
            key: CollectionKey::from(self.key.as_str()),
            label: DEFAULT_COLLECTION_LABEL.to_string(),
            source: self.source.clone(),
            dry_run: false,
        }
    }
}
