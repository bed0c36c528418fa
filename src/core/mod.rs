pub mod app_state;
pub mod errors;
pub mod format;
pub mod period;
pub mod services;
pub mod utils;

pub use app_state::AppState;
pub use errors::{BudgetError, Result};
pub use period::DateWindow;
