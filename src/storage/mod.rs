pub mod sqlite_backend;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::Result;
use crate::domain::{NewTransaction, Transaction, TransactionFilter, TransactionId};

/// Abstraction over persistence backends holding the transaction table.
pub trait LedgerStore {
    /// Appends one row and returns its id.
    fn insert(&self, row: &NewTransaction) -> Result<TransactionId>;

    /// Appends all rows or none of them.
    fn insert_group(&self, rows: &[NewTransaction]) -> Result<Vec<TransactionId>>;

    /// Rows matching `filter`, newest date first and, within a day, newest id first.
    fn query(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// Removes the given ids and returns how many rows were deleted.
    /// Unknown ids are ignored.
    fn delete(&self, ids: &BTreeSet<TransactionId>) -> Result<usize>;

    /// Ids from `ids` that exist in the store.
    fn existing_ids(&self, ids: &BTreeSet<TransactionId>) -> Result<BTreeSet<TransactionId>>;

    /// Running balance of `account`, optionally limited to rows dated on or before `as_of`.
    fn account_balance(&self, account: &str, as_of: Option<NaiveDate>) -> Result<Decimal> {
        let mut filter = TransactionFilter::all().account(account);
        if let Some(cutoff) = as_of {
            filter = filter.until(cutoff);
        }
        Ok(self.query(&filter)?.iter().map(|txn| txn.amount).sum())
    }

    /// Every row carrying `group`.
    fn group_members(&self, group: Uuid) -> Result<Vec<Transaction>> {
        Ok(self
            .query(&TransactionFilter::all())?
            .into_iter()
            .filter(|txn| txn.transfer_group_id == Some(group))
            .collect())
    }
}

pub use sqlite_backend::{SqliteStorage, DEFAULT_DATABASE_FILE};
