//! Aggregations behind the dashboard: totals, category breakdowns, budget
//! comparison against percentage-of-income targets, and account balances.
//!
//! Every function works on an already-filtered row set; [`DashboardSummary::build`]
//! is the one entry point that talks to the store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::core::errors::Result;
use crate::core::period::DateWindow;
use crate::domain::{BudgetTargets, Transaction, TransactionFilter, TransactionKind};
use crate::storage::LedgerStore;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    /// Magnitude of expense and investment outflows.
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcategoryTotal {
    pub category: String,
    pub subcategory: Option<String>,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    UnderTarget,
    NearTarget,
    OverTarget,
    NoIncome,
}

impl Band {
    pub fn label(&self) -> &'static str {
        match self {
            Band::UnderTarget => "under",
            Band::NearTarget => "near",
            Band::OverTarget => "over",
            Band::NoIncome => "no income",
        }
    }
}

/// Usage of a target (in percent of the target) from which a category is "near".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandThresholds {
    pub near: Decimal,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            near: Decimal::from(80),
        }
    }
}

impl BandThresholds {
    pub fn new(near: u32) -> Self {
        Self {
            near: Decimal::from(near),
        }
    }

    fn classify(&self, target_percent: u32, spent: Decimal, used: Option<Decimal>) -> Band {
        let Some(used) = used else {
            return Band::NoIncome;
        };
        if target_percent == 0 {
            return if spent > Decimal::ZERO {
                Band::OverTarget
            } else {
                Band::UnderTarget
            };
        }
        let ratio = used * HUNDRED / Decimal::from(target_percent);
        if ratio < self.near {
            Band::UnderTarget
        } else if ratio <= HUNDRED {
            Band::NearTarget
        } else {
            Band::OverTarget
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetComparisonRow {
    pub category: String,
    pub target_percent: u32,
    pub target_value: Decimal,
    pub spent_value: Decimal,
    /// `None` when there is no income to compare against.
    pub percent_of_income_used: Option<Decimal>,
    pub percent_of_target: Option<Decimal>,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account: String,
    pub balance: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(rows: &[Transaction]) -> Totals {
        let income = sum_where(rows, |txn| txn.kind == TransactionKind::Income);
        let expense = -sum_where(rows, |txn| txn.kind.is_outflow());
        let net = sum_where(rows, |_| true);
        Totals {
            income,
            expense,
            net,
        }
    }

    /// Expense as a percentage of income; zero without income.
    pub fn percent_spent(totals: &Totals) -> Decimal {
        if totals.income.is_zero() {
            Decimal::ZERO
        } else {
            totals.expense * HUNDRED / totals.income
        }
    }

    /// Signed sum per category over every row, largest first.
    pub fn by_category(rows: &[Transaction]) -> Vec<CategoryTotal> {
        group_by_category(rows.iter(), |txn| txn.amount)
    }

    pub fn income_by_category(rows: &[Transaction]) -> Vec<CategoryTotal> {
        group_by_category(
            rows.iter().filter(|txn| txn.kind == TransactionKind::Income),
            |txn| txn.amount,
        )
    }

    /// Expense magnitudes per category, largest first.
    pub fn expenses_by_category(rows: &[Transaction]) -> Vec<CategoryTotal> {
        group_by_category(
            rows.iter().filter(|txn| txn.kind == TransactionKind::Expense),
            |txn| -txn.amount,
        )
    }

    pub fn expenses_by_subcategory(rows: &[Transaction]) -> Vec<SubcategoryTotal> {
        let mut sums: BTreeMap<(String, Option<String>), Decimal> = BTreeMap::new();
        for txn in rows.iter().filter(|txn| txn.kind == TransactionKind::Expense) {
            *sums
                .entry((txn.category.clone(), txn.subcategory.clone()))
                .or_default() -= txn.amount;
        }
        let mut totals: Vec<SubcategoryTotal> = sums
            .into_iter()
            .map(|((category, subcategory), total)| SubcategoryTotal {
                category,
                subcategory,
                total,
            })
            .collect();
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals
    }

    /// One row per target, in target order.
    pub fn budget_comparison(
        rows: &[Transaction],
        targets: &BudgetTargets,
        bands: &BandThresholds,
    ) -> Vec<BudgetComparisonRow> {
        let income = Self::totals(rows).income;
        let has_income = income > Decimal::ZERO;

        targets
            .entries()
            .iter()
            .map(|target| {
                let percent = Decimal::from(target.percent);
                let target_value = if has_income {
                    income * percent / HUNDRED
                } else {
                    Decimal::ZERO
                };
                let spent_value =
                    -sum_where(rows, |txn| txn.kind.is_outflow() && txn.category == target.category);
                let percent_of_income_used = has_income.then(|| spent_value * HUNDRED / income);
                let percent_of_target = (target_value > Decimal::ZERO)
                    .then(|| spent_value * HUNDRED / target_value);
                let band = bands.classify(target.percent, spent_value, percent_of_income_used);
                BudgetComparisonRow {
                    category: target.category.clone(),
                    target_percent: target.percent,
                    target_value,
                    spent_value,
                    percent_of_income_used,
                    percent_of_target,
                    band,
                }
            })
            .collect()
    }

    pub fn over_target_alerts(comparison: &[BudgetComparisonRow]) -> Vec<&BudgetComparisonRow> {
        comparison
            .iter()
            .filter(|row| row.band == Band::OverTarget)
            .collect()
    }

    /// Per-account balances sorted by name; rows without an account are skipped.
    pub fn balances_by_account(rows: &[Transaction]) -> Vec<AccountBalance> {
        let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();
        for txn in rows {
            if let Some(account) = txn.account_name() {
                *sums.entry(account).or_default() += txn.amount;
            }
        }
        sums.into_iter()
            .map(|(account, balance)| AccountBalance {
                account: account.to_string(),
                balance,
            })
            .collect()
    }

    pub fn total_balance(balances: &[AccountBalance]) -> Decimal {
        balances.iter().map(|entry| entry.balance).sum()
    }

    pub fn accounts_with_positive_balance(balances: &[AccountBalance]) -> Vec<&str> {
        balances
            .iter()
            .filter(|entry| entry.balance > Decimal::ZERO)
            .map(|entry| entry.account.as_str())
            .collect()
    }
}

/// Every dashboard view for one window. Balances are cumulative up to the
/// window's end, not limited to its start.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub window: (chrono::NaiveDate, chrono::NaiveDate),
    pub row_count: usize,
    pub totals: Totals,
    pub percent_spent: Decimal,
    pub by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub expenses_by_subcategory: Vec<SubcategoryTotal>,
    pub comparison: Vec<BudgetComparisonRow>,
    pub balances: Vec<AccountBalance>,
    pub total_balance: Decimal,
}

impl DashboardSummary {
    pub fn build<S>(
        store: &S,
        targets: &BudgetTargets,
        window: DateWindow,
        bands: &BandThresholds,
    ) -> Result<Self>
    where
        S: LedgerStore + ?Sized,
    {
        let rows = store.query(&TransactionFilter::within(&window))?;
        let cumulative = store.query(&TransactionFilter::all().until(window.end))?;
        debug!(%window, rows = rows.len(), cumulative = cumulative.len(), "building summary");

        let totals = SummaryService::totals(&rows);
        let balances = SummaryService::balances_by_account(&cumulative);
        Ok(Self {
            window: (window.start, window.end),
            row_count: rows.len(),
            totals,
            percent_spent: SummaryService::percent_spent(&totals),
            by_category: SummaryService::by_category(&rows),
            income_by_category: SummaryService::income_by_category(&rows),
            expenses_by_category: SummaryService::expenses_by_category(&rows),
            expenses_by_subcategory: SummaryService::expenses_by_subcategory(&rows),
            comparison: SummaryService::budget_comparison(&rows, targets, bands),
            total_balance: SummaryService::total_balance(&balances),
            balances,
        })
    }

    pub fn alerts(&self) -> Vec<&BudgetComparisonRow> {
        SummaryService::over_target_alerts(&self.comparison)
    }
}

fn sum_where<F>(rows: &[Transaction], predicate: F) -> Decimal
where
    F: Fn(&Transaction) -> bool,
{
    rows.iter()
        .filter(|txn| predicate(txn))
        .map(|txn| txn.amount)
        .sum()
}

fn group_by_category<'a, I, F>(rows: I, value: F) -> Vec<CategoryTotal>
where
    I: Iterator<Item = &'a Transaction>,
    F: Fn(&Transaction) -> Decimal,
{
    let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();
    for txn in rows {
        *sums.entry(txn.category.as_str()).or_default() += value(txn);
    }
    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    // Stable sort keeps ties in name order.
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}
