//! Error types for eq5e-sheet.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while building a sheet.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Actor JSON did not match the expected shape.
    #[error("invalid actor data: {0}")]
    Actor(#[from] serde_json::Error),

    /// Race-bonus document is not a `{ race: { ability: bonus } }` map.
    #[error("invalid race bonus table: {0}")]
    RaceTable(serde_json::Error),

    /// No sheet is registered for this actor type.
    #[error("unsupported actor type `{actor_type}` (expected character, npc or pet)")]
    UnsupportedActorType { actor_type: String },

    /// Filesystem error while reading actor or race-bonus data.
    #[error("sheet io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SheetError {
    SheetError::Io {
        path: path.into(),
        source,
    }
}
