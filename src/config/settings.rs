//! Budget targets and category lists, one JSON document each.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::core::{
    errors::Result,
    utils::{ensure_dir, write_json_atomic, PathResolver},
};
use crate::domain::{BudgetTargets, CategoryGroup, CategorySet};

pub struct SettingsManager {
    targets_path: PathBuf,
    categories_path: PathBuf,
}

impl SettingsManager {
    pub fn with_base_dir(base: &Path) -> Result<Self> {
        ensure_dir(base)?;
        Ok(Self {
            targets_path: PathResolver::targets_file_in(base),
            categories_path: PathResolver::categories_file_in(base),
        })
    }

    /// Persisted targets when a non-empty, in-range set was saved, otherwise the defaults.
    pub fn load_targets(&self) -> Result<BudgetTargets> {
        match read_document::<BudgetTargets>(&self.targets_path)? {
            Some(targets) if !targets.is_empty() => match targets.out_of_range() {
                Some(entry) => {
                    warn!(
                        path = %self.targets_path.display(),
                        category = %entry.category,
                        percent = entry.percent,
                        "ignoring targets outside 0..=100"
                    );
                    Ok(BudgetTargets::default())
                }
                None => Ok(targets),
            },
            _ => Ok(BudgetTargets::default()),
        }
    }

    /// Overwrites the stored targets. Requires a total of exactly 100%.
    pub fn save_targets(&self, targets: &BudgetTargets) -> Result<()> {
        targets.validate_for_save()?;
        write_json_atomic(&self.targets_path, targets)?;
        info!(entries = targets.entries().len(), "budget targets saved");
        Ok(())
    }

    pub fn reset_targets(&self) -> Result<BudgetTargets> {
        let defaults = BudgetTargets::default();
        write_json_atomic(&self.targets_path, &defaults)?;
        info!("budget targets reset to defaults");
        Ok(defaults)
    }

    /// Stored lists merged over the defaults; every group is present.
    pub fn load_categories(&self) -> Result<CategorySet> {
        let persisted =
            read_document::<BTreeMap<CategoryGroup, Vec<String>>>(&self.categories_path)?
                .unwrap_or_default();
        Ok(CategorySet::merged_over_defaults(persisted))
    }

    pub fn save_categories(&self, categories: &CategorySet) -> Result<()> {
        write_json_atomic(&self.categories_path, categories)?;
        info!("categories saved");
        Ok(())
    }

    pub fn reset_categories(&self) -> Result<CategorySet> {
        let defaults = CategorySet::default();
        self.save_categories(&defaults)?;
        Ok(defaults)
    }

    pub fn targets_path(&self) -> &Path {
        &self.targets_path
    }

    pub fn categories_path(&self) -> &Path {
        &self.categories_path
    }
}

/// `None` when the file is absent or unreadable as `T`.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    match serde_json::from_str(&data) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable settings document");
            Ok(None)
        }
    }
}
