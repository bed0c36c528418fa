#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use budget_dashboard::core::AppState;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Application state backed by its own data directory and database.
pub fn setup_state() -> AppState {
    AppState::with_base_dir(temp_base()).expect("load state for temp dir")
}
