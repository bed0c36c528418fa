use chrono::NaiveDate;

use crate::core::period::DateWindow;
use crate::domain::transaction::TransactionKind;

/// Independently optional criteria for ledger queries. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub account: Option<String>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn within(window: &DateWindow) -> Self {
        Self::default().since(window.start).until(window.end)
    }

    pub fn since(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }
}
