//! Turns validated entries into ledger rows.

use tracing::{info, warn};

use crate::config::FundsPolicy;
use crate::core::errors::{BudgetError, Result};
use crate::domain::{Entry, TransactionId};
use crate::storage::LedgerStore;

pub struct EntryService;

impl EntryService {
    /// Validates `entry`, applies the funds policy, and writes its rows.
    /// Paired rows go through a single atomic group insert.
    pub fn submit<S>(store: &S, policy: FundsPolicy, entry: &Entry) -> Result<Vec<TransactionId>>
    where
        S: LedgerStore + ?Sized,
    {
        let rows = entry.rows()?;
        Self::check_funds(store, policy, entry)?;

        let ids = match rows.as_slice() {
            [single] => vec![store.insert(single)?],
            pair => store.insert_group(pair)?,
        };
        info!(
            kind = %entry.kind(),
            amount = %entry.amount(),
            date = %entry.date(),
            ?ids,
            "entry recorded"
        );
        Ok(ids)
    }

    /// Rejects fund moves whose source balance cannot cover the amount.
    pub fn check_funds<S>(store: &S, policy: FundsPolicy, entry: &Entry) -> Result<()>
    where
        S: LedgerStore + ?Sized,
    {
        if !policy.applies_to(entry) {
            return Ok(());
        }
        let Some(source) = entry.source_account() else {
            return Ok(());
        };
        let source = source.trim();
        let available = store.account_balance(source, None)?;
        if entry.amount() > available {
            warn!(account = source, %available, requested = %entry.amount(), "insufficient funds");
            return Err(BudgetError::validation(format!(
                "insufficient funds in {}: {:.2} available",
                source, available
            )));
        }
        Ok(())
    }
}
