use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use super::errors::Result;

const DEFAULT_DIR_NAME: &str = ".budget_dashboard";
const HOME_ENV: &str = "BUDGET_DASHBOARD_HOME";
const CONFIG_FILE: &str = "config.json";
const TARGETS_FILE: &str = "targets.json";
const CATEGORIES_FILE: &str = "categories.json";
pub(crate) const TMP_SUFFIX: &str = "tmp";

/// Resolves every on-disk location relative to one base directory.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, defaulting to `~/.budget_dashboard`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn targets_file_in(base: &Path) -> PathBuf {
        base.join(TARGETS_FILE)
    }

    pub fn categories_file_in(base: &Path) -> PathBuf {
        base.join(CATEGORIES_FILE)
    }

    /// Database path; relative names are anchored at `base`.
    pub fn database_file_in(base: &Path, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            base.join(file)
        }
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// `targets.json` -> `targets.json.tmp`
pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Serializes `value` next to `path` and renames it into place.
pub(crate) fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
