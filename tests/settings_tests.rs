mod common;

use budget_dashboard::{
    config::{AppConfig, ConfigManager, FundsPolicy, SettingsManager},
    core::AppState,
    domain::{BudgetTargets, CategoryGroup},
};
use common::{setup_state, temp_base};

#[test]
fn targets_over_one_hundred_are_not_saved() {
    let state = setup_state();
    let mut targets = state.targets.clone();
    targets.set("Custos Fixos", 45);
    assert_eq!(targets.total(), 105);

    let err = state.settings.save_targets(&targets).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(state.settings.load_targets().unwrap(), BudgetTargets::default());

    targets.set("Lazer", 5);
    assert_eq!(targets.total(), 100);
    state.settings.save_targets(&targets).unwrap();
    assert_eq!(state.settings.load_targets().unwrap().get("Custos Fixos"), Some(45));
}

#[test]
fn settings_survive_a_restart() {
    let base = temp_base();
    {
        let mut state = AppState::with_base_dir(base.clone()).unwrap();
        let mut categories = state.categories.clone();
        categories.add(CategoryGroup::Bank, "Inter").unwrap();
        state.settings.save_categories(&categories).unwrap();

        let mut config = state.config.clone();
        config.set_field("funds_policy", "disabled").unwrap();
        config.set_field("currency_symbol", "€").unwrap();
        state.update_config(config).unwrap();
    }

    let state = AppState::with_base_dir(base.clone()).unwrap();
    assert!(state.categories.accounts().iter().any(|a| a == "Inter"));
    assert_eq!(state.config.funds_policy, FundsPolicy::Disabled);
    assert_eq!(state.config.currency_symbol, "€");

    let reread = ConfigManager::with_base_dir(base).unwrap().load().unwrap();
    assert_ne!(reread, AppConfig::default());
}

#[test]
fn moving_the_database_reopens_the_store() {
    let base = temp_base();
    let mut state = AppState::with_base_dir(base.clone()).unwrap();
    let mut config = state.config.clone();
    config.set_field("database_file", "other.db").unwrap();
    state.update_config(config).unwrap();
    assert_eq!(state.store.path(), base.join("other.db"));
    assert!(base.join("other.db").exists());
}

#[test]
fn category_reset_restores_defaults() {
    let base = temp_base();
    let settings = SettingsManager::with_base_dir(&base).unwrap();
    let mut categories = settings.load_categories().unwrap();
    assert!(categories.remove(CategoryGroup::Leisure, "Hobbies"));
    settings.save_categories(&categories).unwrap();

    assert!(!settings
        .load_categories()
        .unwrap()
        .contains(CategoryGroup::Leisure, "Hobbies"));

    let restored = settings.reset_categories().unwrap();
    assert_eq!(restored, settings.load_categories().unwrap());
    assert_eq!(
        restored.labels(CategoryGroup::Leisure),
        budget_dashboard::domain::CategorySet::default().labels(CategoryGroup::Leisure)
    );
}
