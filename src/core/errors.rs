use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for domain, storage, and settings layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("{0}")]
    Validation(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Fatal shell failures; command-level errors are reported and the shell continues.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl BudgetError {
    pub fn validation(message: impl Into<String>) -> Self {
        BudgetError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BudgetError::Validation(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for BudgetError {
    fn from(err: rusqlite::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}
