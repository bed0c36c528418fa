//! Ledger rows and their kinds.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Displayable;

pub type TransactionId = i64;

/// Category label written on both legs of a plain transfer.
pub const TRANSFER_CATEGORY: &str = "Transferência";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionKind {
    Income,
    Expense,
    Investment,
    Transfer,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Income,
        TransactionKind::Expense,
        TransactionKind::Investment,
        TransactionKind::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Investment => "Investment",
            TransactionKind::Transfer => "Transfer",
        }
    }

    /// Outflows counted as spending in totals and budget comparisons.
    pub fn is_outflow(&self) -> bool {
        matches!(self, TransactionKind::Expense | TransactionKind::Investment)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction type `{}`", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for TransactionKind {
    type Err = UnknownKind;

    /// Accepts the stored names plus the Portuguese labels used by older data.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(TransactionKind::Income),
            "expense" | "despesa" => Ok(TransactionKind::Expense),
            "investment" | "investimento" | "invest" => Ok(TransactionKind::Investment),
            "transfer" | "transferência" | "transferencia" => Ok(TransactionKind::Transfer),
            _ => Err(UnknownKind(value.to_string())),
        }
    }
}

/// Insert payload: a ledger row before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub subcategory: Option<String>,
    pub account: Option<String>,
    pub transfer_group_id: Option<Uuid>,
    pub description: Option<String>,
    #[serde(default)]
    pub reconciled: bool,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        date: NaiveDate,
        amount: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            date,
            amount,
            category: category.into(),
            subcategory: None,
            account: None,
            transfer_group_id: None,
            description: None,
            reconciled: false,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: Option<String>) -> Self {
        self.subcategory = subcategory.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn with_group(mut self, group: Uuid) -> Self {
        self.transfer_group_id = Some(group);
        self
    }
}

/// A persisted ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub subcategory: Option<String>,
    pub account: Option<String>,
    pub transfer_group_id: Option<Uuid>,
    pub description: Option<String>,
    #[serde(default)]
    pub reconciled: bool,
}

impl Transaction {
    pub fn from_new(id: TransactionId, row: NewTransaction) -> Self {
        Self {
            id,
            kind: row.kind,
            date: row.date,
            amount: row.amount,
            category: row.category,
            subcategory: row.subcategory,
            account: row.account,
            transfer_group_id: row.transfer_group_id,
            description: row.description,
            reconciled: row.reconciled,
        }
    }

    /// Account name when present and non-blank.
    pub fn account_name(&self) -> Option<&str> {
        self.account
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "#{} {} {} {} ({})",
            self.id,
            self.date,
            self.kind,
            self.amount,
            self.account_name().unwrap_or("-")
        )
    }
}
