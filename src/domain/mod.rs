//! Plain data types shared by storage, services, and the shell.

pub mod categories;
pub mod common;
pub mod entry;
pub mod filter;
pub mod targets;
pub mod transaction;

pub use categories::{CategoryGroup, CategorySet};
pub use entry::Entry;
pub use filter::TransactionFilter;
pub use targets::{BudgetTargets, TargetEntry, TargetTotal};
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionKind};
