use std::path::PathBuf;

use tracing::info;

use crate::config::{AppConfig, ConfigManager, SettingsManager};
use crate::core::errors::Result;
use crate::core::services::BandThresholds;
use crate::domain::{BudgetTargets, CategorySet};
use crate::storage::SqliteStorage;

/// Everything one session works against, built once and passed explicitly.
pub struct AppState {
    pub config_manager: ConfigManager,
    pub config: AppConfig,
    pub store: SqliteStorage,
    pub settings: SettingsManager,
    pub targets: BudgetTargets,
    pub categories: CategorySet,
}

impl AppState {
    /// Loads state from the default data directory.
    pub fn load() -> Result<Self> {
        Self::from_manager(ConfigManager::new()?)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_manager(ConfigManager::with_base_dir(base)?)
    }

    fn from_manager(config_manager: ConfigManager) -> Result<Self> {
        let config = config_manager.load()?;
        let store = SqliteStorage::open(config_manager.database_path(&config))?;
        let settings = SettingsManager::with_base_dir(config_manager.base_dir())?;
        let targets = settings.load_targets()?;
        let categories = settings.load_categories()?;
        info!(
            base = %config_manager.base_dir().display(),
            database = %store.path().display(),
            "application state loaded"
        );
        Ok(Self {
            config_manager,
            config,
            store,
            settings,
            targets,
            categories,
        })
    }

    pub fn bands(&self) -> BandThresholds {
        BandThresholds::new(self.config.near_target_threshold)
    }

    /// Opens the new database first, so a path that cannot be opened leaves
    /// both the saved config and the session untouched.
    pub fn update_config(&mut self, config: AppConfig) -> Result<()> {
        let database = self.config_manager.database_path(&config);
        let reopened = if database != self.store.path() {
            Some(SqliteStorage::open(database)?)
        } else {
            None
        };
        self.config_manager.save(&config)?;
        if let Some(store) = reopened {
            self.store = store;
        }
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_directory_gets_defaults_and_a_database() {
        let dir = TempDir::new().unwrap();
        let state = AppState::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(state.targets, BudgetTargets::default());
        assert!(dir.path().join("budget.db").exists());
        assert_eq!(state.bands(), BandThresholds::default());
    }

    #[test]
    fn changing_database_file_reopens_store() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = state.config.clone();
        config.set_field("database_file", "other.db").unwrap();
        state.update_config(config).unwrap();
        assert_eq!(state.store.path(), dir.path().join("other.db"));
        assert!(dir.path().join("config.json").exists());
    }

    #[test]
    fn unopenable_database_keeps_previous_config() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::with_base_dir(dir.path().to_path_buf()).unwrap();
        std::fs::write(dir.path().join("blocker"), "not a directory").unwrap();

        let mut config = state.config.clone();
        config.set_field("database_file", "blocker/budget.db").unwrap();
        assert!(state.update_config(config).is_err());

        assert_eq!(state.store.path(), dir.path().join("budget.db"));
        assert_eq!(state.config, AppConfig::default());
        assert_eq!(state.config_manager.load().unwrap(), AppConfig::default());
    }
}
