//! User-submitted entries and the ledger rows each one produces.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{BudgetError, Result};
use crate::domain::categories::CategoryGroup;
use crate::domain::transaction::{NewTransaction, TransactionKind, TRANSFER_CATEGORY};

/// Largest amount a single entry may carry. Keeps every sum, percentage, and
/// balance computed over the ledger well inside `Decimal` range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// One user action. `amount` is always a positive magnitude; signs are applied
/// when rows are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entry {
    Income {
        date: NaiveDate,
        amount: Decimal,
        source: String,
        account: String,
        description: Option<String>,
    },
    Expense {
        date: NaiveDate,
        amount: Decimal,
        group: CategoryGroup,
        subcategory: Option<String>,
        account: String,
        description: Option<String>,
    },
    /// Without a `destination` the money leaves `account` in place; with one it
    /// moves into the destination account as a linked pair.
    Investment {
        date: NaiveDate,
        amount: Decimal,
        asset: String,
        account: String,
        destination: Option<String>,
        description: Option<String>,
    },
    Transfer {
        date: NaiveDate,
        amount: Decimal,
        from: String,
        to: String,
        description: Option<String>,
    },
}

impl Entry {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Entry::Income { .. } => TransactionKind::Income,
            Entry::Expense { .. } => TransactionKind::Expense,
            Entry::Investment { .. } => TransactionKind::Investment,
            Entry::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Entry::Income { date, .. }
            | Entry::Expense { date, .. }
            | Entry::Investment { date, .. }
            | Entry::Transfer { date, .. } => *date,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Entry::Income { amount, .. }
            | Entry::Expense { amount, .. }
            | Entry::Investment { amount, .. }
            | Entry::Transfer { amount, .. } => *amount,
        }
    }

    /// True for entries written as a linked debit/credit pair.
    pub fn moves_funds(&self) -> bool {
        matches!(
            self,
            Entry::Transfer { .. }
                | Entry::Investment {
                    destination: Some(_),
                    ..
                }
        )
    }

    /// Account debited by a fund move.
    pub fn source_account(&self) -> Option<&str> {
        match self {
            Entry::Transfer { from, .. } => Some(from),
            Entry::Investment {
                account,
                destination: Some(_),
                ..
            } => Some(account),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount() <= Decimal::ZERO {
            return Err(BudgetError::validation("amount must be greater than zero"));
        }
        if self.amount() > Decimal::from(MAX_AMOUNT) {
            return Err(BudgetError::validation(format!(
                "amount must not exceed {}",
                MAX_AMOUNT
            )));
        }
        match self {
            Entry::Income {
                source, account, ..
            } => {
                require("income source", source)?;
                require("account", account)
            }
            Entry::Expense { group, account, .. } => {
                if !group.is_expense() {
                    return Err(BudgetError::validation(format!(
                        "{} is not an expense category",
                        group
                    )));
                }
                require("account", account)
            }
            Entry::Investment {
                asset,
                account,
                destination,
                ..
            } => {
                require("investment type", asset)?;
                require("account", account)?;
                if let Some(destination) = destination {
                    require("destination account", destination)?;
                    ensure_distinct(account, destination)?;
                }
                Ok(())
            }
            Entry::Transfer { from, to, .. } => {
                require("source account", from)?;
                require("destination account", to)?;
                ensure_distinct(from, to)
            }
        }
    }

    /// Validates and produces the rows to insert, with a fresh group id for pairs.
    pub fn rows(&self) -> Result<Vec<NewTransaction>> {
        self.rows_with_group(Uuid::new_v4())
    }

    /// Like [`Entry::rows`] with a caller-chosen group id; single-row entries ignore it.
    pub fn rows_with_group(&self, group: Uuid) -> Result<Vec<NewTransaction>> {
        self.validate()?;
        let rows = match self {
            Entry::Income {
                date,
                amount,
                source,
                account,
                description,
            } => vec![NewTransaction::new(TransactionKind::Income, *date, *amount, source.trim())
                .with_account(account.trim())
                .with_description(description.clone())],
            Entry::Expense {
                date,
                amount,
                group: category,
                subcategory,
                account,
                description,
            } => vec![NewTransaction::new(
                TransactionKind::Expense,
                *date,
                -*amount,
                category.label(),
            )
            .with_subcategory(subcategory.clone())
            .with_account(account.trim())
            .with_description(description.clone())],
            Entry::Investment {
                date,
                amount,
                asset,
                account,
                destination,
                description,
            } => {
                let debit = NewTransaction::new(
                    TransactionKind::Investment,
                    *date,
                    -*amount,
                    CategoryGroup::Investment.label(),
                )
                .with_subcategory(Some(asset.trim().to_string()))
                .with_account(account.trim())
                .with_description(description.clone());
                match destination {
                    None => vec![debit],
                    Some(destination) => {
                        // The credit leg is booked as a transfer so the invested
                        // amount still counts against the investment target.
                        let credit = NewTransaction::new(
                            TransactionKind::Transfer,
                            *date,
                            *amount,
                            TRANSFER_CATEGORY,
                        )
                        .with_subcategory(Some(asset.trim().to_string()))
                        .with_account(destination.trim())
                        .with_description(description.clone())
                        .with_group(group);
                        vec![debit.with_group(group), credit]
                    }
                }
            }
            Entry::Transfer {
                date,
                amount,
                from,
                to,
                description,
            } => {
                let debit = NewTransaction::new(
                    TransactionKind::Transfer,
                    *date,
                    -*amount,
                    TRANSFER_CATEGORY,
                )
                .with_account(from.trim())
                .with_description(description.clone())
                .with_group(group);
                let mut credit = debit.clone();
                credit.amount = *amount;
                credit.account = Some(to.trim().to_string());
                vec![debit, credit]
            }
        };
        Ok(rows)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(BudgetError::validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

fn ensure_distinct(source: &str, destination: &str) -> Result<()> {
    if source.trim() == destination.trim() {
        Err(BudgetError::validation("source and destination must differ"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn transfer(amount: Decimal, from: &str, to: &str) -> Entry {
        Entry::Transfer {
            date: day(1),
            amount,
            from: from.into(),
            to: to.into(),
            description: None,
        }
    }

    #[test]
    fn income_credits_the_account() {
        let entry = Entry::Income {
            date: day(10),
            amount: dec!(1000),
            source: "Salário/Renda principal".into(),
            account: "A".into(),
            description: Some("fev".into()),
        };
        let rows = entry.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, dec!(1000));
        assert_eq!(rows[0].kind, TransactionKind::Income);
        assert_eq!(rows[0].transfer_group_id, None);
    }

    #[test]
    fn expense_debits_under_its_group_label() {
        let entry = Entry::Expense {
            date: day(15),
            amount: dec!(200),
            group: CategoryGroup::FixedCosts,
            subcategory: Some("Aluguel".into()),
            account: "A".into(),
            description: None,
        };
        let rows = entry.rows().unwrap();
        assert_eq!(rows[0].amount, dec!(-200));
        assert_eq!(rows[0].category, "Custos Fixos");
        assert_eq!(rows[0].subcategory.as_deref(), Some("Aluguel"));
    }

    #[test]
    fn transfer_produces_balanced_pair() {
        let group = Uuid::new_v4();
        let rows = transfer(dec!(300), "A", "B").rows_with_group(group).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount + rows[1].amount, Decimal::ZERO);
        assert_eq!(rows[0].amount, dec!(-300));
        assert_eq!(rows[0].account.as_deref(), Some("A"));
        assert_eq!(rows[1].account.as_deref(), Some("B"));
        assert!(rows.iter().all(|row| row.transfer_group_id == Some(group)));
    }

    #[test]
    fn investment_in_place_is_a_single_debit() {
        let entry = Entry::Investment {
            date: day(3),
            amount: dec!(50),
            asset: "Renda Fixa".into(),
            account: "A".into(),
            destination: None,
            description: None,
        };
        assert!(!entry.moves_funds());
        let rows = entry.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, dec!(-50));
        assert_eq!(rows[0].category, "Investimento");
        assert_eq!(rows[0].subcategory.as_deref(), Some("Renda Fixa"));
    }

    #[test]
    fn investment_move_links_both_legs() {
        let entry = Entry::Investment {
            date: day(3),
            amount: dec!(75.5),
            asset: "Ações".into(),
            account: "A".into(),
            destination: Some("Corretora".into()),
            description: None,
        };
        assert_eq!(entry.source_account(), Some("A"));
        let rows = entry.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, TransactionKind::Investment);
        assert_eq!(rows[1].kind, TransactionKind::Transfer);
        assert_eq!(rows[0].amount + rows[1].amount, Decimal::ZERO);
        assert_eq!(rows[0].transfer_group_id, rows[1].transfer_group_id);
        assert!(rows[0].transfer_group_id.is_some());
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in [Decimal::ZERO, dec!(-1)] {
            let err = transfer(amount, "A", "B").rows().unwrap_err();
            assert_eq!(err.to_string(), "amount must be greater than zero");
        }
    }

    #[test]
    fn amounts_above_the_ceiling_are_rejected() {
        let ceiling = Decimal::from(MAX_AMOUNT);
        assert!(transfer(ceiling, "A", "B").validate().is_ok());
        for amount in [ceiling + dec!(0.01), dec!(1e27), Decimal::MAX] {
            let err = transfer(amount, "A", "B").rows().unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains("must not exceed"), "{err}");
        }
    }

    #[test]
    fn equal_accounts_are_rejected() {
        let err = transfer(dec!(10), "A", " A ").rows().unwrap_err();
        assert_eq!(err.to_string(), "source and destination must differ");
    }

    #[test]
    fn expense_must_use_an_expense_group() {
        let entry = Entry::Expense {
            date: day(1),
            amount: dec!(1),
            group: CategoryGroup::Bank,
            subcategory: None,
            account: "A".into(),
            description: None,
        };
        assert!(entry.validate().unwrap_err().is_validation());
    }
}
