//! EQ5e core library: domain types, record metadata, settings and errors.
//!
//! - [`types`]: identifier newtypes and the caller [`Role`]
//! - [`record`]: reserved `flags.eq5e` metadata in document payloads
//! - [`settings`]: per-installation settings load / save
//! - [`paths`]: `~/.eq5e/` layout
//! - [`error`]: [`SettingsError`]

pub mod error;
pub mod paths;
pub mod record;
pub mod settings;
pub mod types;

pub use error::SettingsError;
pub use settings::{SettingKey, Settings};
pub use types::{CollectionKey, DocumentId, Role, SpellId};
