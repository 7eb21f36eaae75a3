//! Error types for eq5e-sync.

use std::path::PathBuf;

use thiserror::Error;

use eq5e_core::SettingsError;

/// All errors that can arise from spell sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The desired set could not be loaded (transport failure, non-2xx
    /// status, unreadable file, or a body that is not a JSON array).
    #[error("source unavailable: {source_ref}: {reason}")]
    SourceUnavailable { source_ref: String, reason: String },

    /// A privileged operation was attempted by an unprivileged caller.
    #[error("permission denied: {action}")]
    PermissionDenied { action: String },

    /// The store rejected a create or update batch.
    #[error("store write failed for {collection}: {reason}")]
    StoreWriteFailure { collection: String, reason: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (collection files).
    #[error("collection JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error from the settings layer.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SyncError::SourceUnavailable`].
pub(crate) fn source_err(source_ref: impl Into<String>, reason: impl ToString) -> SyncError {
    SyncError::SourceUnavailable {
        source_ref: source_ref.into(),
        reason: reason.to_string(),
    }
}

/// Convenience constructor for [`SyncError::StoreWriteFailure`].
pub(crate) fn write_err(collection: impl Into<String>, reason: impl ToString) -> SyncError {
    SyncError::StoreWriteFailure {
        collection: collection.into(),
        reason: reason.to_string(),
    }
}
