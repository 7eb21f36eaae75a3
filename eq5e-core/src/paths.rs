use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.yaml";
pub const PACKS_DIR: &str = "packs";

pub fn eq5e_root(home: &Path) -> PathBuf {
    home.join(".eq5e")
}

pub fn settings_path(home: &Path) -> PathBuf {
    eq5e_root(home).join(SETTINGS_FILE)
}

pub fn packs_dir(home: &Path) -> PathBuf {
    eq5e_root(home).join(PACKS_DIR)
}
