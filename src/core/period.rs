//! Reporting windows: inclusive date ranges built from a year and a month span.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::core::errors::{BudgetError, Result};
use crate::domain::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BudgetError::validation(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// First day of `start_month` through the last day of `end_month`.
    pub fn for_months(year: i32, start_month: u32, end_month: u32) -> Result<Self> {
        if !(1..=12).contains(&start_month) || !(1..=12).contains(&end_month) {
            return Err(BudgetError::validation("months must be between 1 and 12"));
        }
        if start_month > end_month {
            return Err(BudgetError::validation(format!(
                "start month {} is after end month {}",
                start_month, end_month
            )));
        }
        let start = NaiveDate::from_ymd_opt(year, start_month, 1)
            .ok_or_else(|| BudgetError::validation(format!("invalid year {}", year)))?;
        let end = last_day_of_month(year, end_month)
            .ok_or_else(|| BudgetError::validation(format!("invalid year {}", year)))?;
        Self::new(start, end)
    }

    /// January through the month of `today`, the dashboard's default span.
    pub fn year_to_date(today: NaiveDate) -> Result<Self> {
        Self::for_months(today.year(), 1, today.month())
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Distinct years present in `rows`, ascending; the current year when empty.
pub fn available_years(rows: &[Transaction], today: NaiveDate) -> Vec<i32> {
    let years: BTreeSet<i32> = rows.iter().map(|txn| txn.date.year()).collect();
    if years.is_empty() {
        vec![today.year()]
    } else {
        years.into_iter().collect()
    }
}
