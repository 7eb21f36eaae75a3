//! Per-installation settings.
//!
//! # Storage layout
//!
//! ```text
//! ~/.eq5e/
//!   settings.yaml   (mode 0600)
//! ```
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)` takes an explicit home; used in tests with `TempDir`
//! - `fn(…)` derives home from `dirs::home_dir()` and delegates to `_at`

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::paths::{eq5e_root, settings_path};

/// Installation-scoped settings.
///
/// Every field has a serde default so older or hand-edited files with
/// missing keys still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Import core spells when the world becomes ready. Default `true`.
    #[serde(default = "default_true")]
    pub core_spells_on_startup: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            core_spells_on_startup: true,
            updated_at: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Named keys accepted by [`Settings::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    CoreSpellsOnStartup,
}

impl SettingKey {
    pub fn all() -> &'static [SettingKey] {
        &[SettingKey::CoreSpellsOnStartup]
    }

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::CoreSpellsOnStartup => "core-spells-on-startup",
        }
    }

    /// Human label shown next to the setting.
    pub fn label(self) -> &'static str {
        match self {
            SettingKey::CoreSpellsOnStartup => "Core Spells: Import spells on startup",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            SettingKey::CoreSpellsOnStartup => {
                "If enabled, the core spell compendium is generated/updated when the world is ready."
            }
        }
    }
}

impl std::str::FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace('_', "-").to_ascii_lowercase();
        SettingKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| format!("unknown setting '{s}'; expected: core-spells-on-startup"))
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::CoreSpellsOnStartup => self.core_spells_on_startup,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::CoreSpellsOnStartup => self.core_spells_on_startup = value,
        }
        self.updated_at = Some(Utc::now());
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load settings from `<home>/.eq5e/settings.yaml`.
///
/// A missing file yields [`Settings::default`]. Malformed YAML is reported
/// as [`SettingsError::Parse`] with the file path.
pub fn load_at(home: &Path) -> Result<Settings, SettingsError> {
    let path = settings_path(home);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| SettingsError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, SettingsError> {
    load_at(&home()?)
}

/// Atomically save settings to `<home>/.eq5e/settings.yaml`.
///
/// Write flow: serialize → `settings.yaml.tmp` → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let dir = eq5e_root(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    let path = settings_path(home);
    let tmp_path = path.with_extension("yaml.tmp");

    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(settings: &Settings) -> Result<(), SettingsError> {
    save_at(&home()?, settings)
}

/// Load, set one key, save. Returns the updated settings.
pub fn update_at(home: &Path, key: SettingKey, value: bool) -> Result<Settings, SettingsError> {
    let mut settings = load_at(home)?;
    settings.set(key, value);
    save_at(home, &settings)?;
    Ok(settings)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, SettingsError> {
    dirs::home_dir().ok_or(SettingsError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), SettingsError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), SettingsError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), SettingsError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), SettingsError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
