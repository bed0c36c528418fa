//! Application configuration persisted as `config.json` in the data directory.

pub mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    errors::{BudgetError, Result},
    utils::{ensure_dir, write_json_atomic, PathResolver},
};
use crate::domain::Entry;
use crate::storage::DEFAULT_DATABASE_FILE;

pub use settings::SettingsManager;

/// Which entries are checked against the source account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundsPolicy {
    Disabled,
    TransfersOnly,
    #[default]
    AllMoves,
}

impl FundsPolicy {
    pub fn applies_to(&self, entry: &Entry) -> bool {
        match self {
            FundsPolicy::Disabled => false,
            FundsPolicy::TransfersOnly => matches!(entry, Entry::Transfer { .. }),
            FundsPolicy::AllMoves => entry.moves_funds(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FundsPolicy::Disabled => "disabled",
            FundsPolicy::TransfersOnly => "transfers_only",
            FundsPolicy::AllMoves => "all_moves",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "disabled" | "off" => Ok(FundsPolicy::Disabled),
            "transfers_only" | "transfers" => Ok(FundsPolicy::TransfersOnly),
            "all_moves" | "all" => Ok(FundsPolicy::AllMoves),
            other => Err(BudgetError::validation(format!(
                "unknown funds policy `{}` (disabled, transfers_only, all_moves)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Relative paths are resolved against the data directory.
    pub database_file: PathBuf,
    pub currency_symbol: String,
    pub funds_policy: FundsPolicy,
    pub near_target_threshold: u32,
    pub strict_delete: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_file: PathBuf::from(DEFAULT_DATABASE_FILE),
            currency_symbol: "R$".into(),
            funds_policy: FundsPolicy::default(),
            near_target_threshold: 80,
            strict_delete: false,
        }
    }
}

impl AppConfig {
    /// Applies one `key value` pair as entered in the shell.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "database_file" => {
                if value.trim().is_empty() {
                    return Err(BudgetError::validation("database_file cannot be blank"));
                }
                self.database_file = PathBuf::from(value.trim());
            }
            "currency_symbol" => self.currency_symbol = value.trim().to_string(),
            "funds_policy" => self.funds_policy = FundsPolicy::parse(value)?,
            "near_target_threshold" => {
                let threshold: u32 = value.trim().parse().map_err(|_| {
                    BudgetError::validation("near_target_threshold must be a whole number")
                })?;
                if threshold > 100 {
                    return Err(BudgetError::validation(
                        "near_target_threshold must be between 0 and 100",
                    ));
                }
                self.near_target_threshold = threshold;
            }
            "strict_delete" => {
                self.strict_delete = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(BudgetError::validation("strict_delete must be true or false")),
                }
            }
            other => {
                return Err(BudgetError::Config(format!("unknown setting `{}`", other)));
            }
        }
        Ok(())
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("database_file", self.database_file.display().to_string()),
            ("currency_symbol", self.currency_symbol.clone()),
            ("funds_policy", self.funds_policy.as_str().to_string()),
            ("near_target_threshold", self.near_target_threshold.to_string()),
            ("strict_delete", self.strict_delete.to_string()),
        ]
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Missing file yields defaults; unknown keys are ignored.
    pub fn load(&self) -> Result<AppConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                BudgetError::Config(format!("{}: {}", self.path.display(), err))
            })
        } else {
            debug!(path = %self.path.display(), "no config file, using defaults");
            Ok(AppConfig::default())
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        write_json_atomic(&self.path, config)
    }

    pub fn database_path(&self, config: &AppConfig) -> PathBuf {
        PathResolver::database_file_in(&self.base, &config.database_file)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
