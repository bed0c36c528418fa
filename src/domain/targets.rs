//! Percentage-of-income budget targets per category.

use serde::{Deserialize, Serialize};

use crate::core::errors::{BudgetError, Result};
use crate::domain::categories::CategoryGroup;

pub const FULL_ALLOCATION: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntry {
    pub category: String,
    pub percent: u32,
}

/// How far the configured percentages are from a full allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTotal {
    Exact,
    Under(u64),
    Over(u64),
}

/// Ordered category -> percent mapping. Deviation from 100 is tolerated here and
/// only rejected by [`BudgetTargets::validate_for_save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetTargets {
    entries: Vec<TargetEntry>,
}

impl Default for BudgetTargets {
    fn default() -> Self {
        Self::from_pairs([
            (CategoryGroup::FixedCosts.label(), 40),
            (CategoryGroup::VariableCosts.label(), 15),
            (CategoryGroup::Goals.label(), 10),
            (CategoryGroup::Leisure.label(), 10),
            (CategoryGroup::Education.label(), 5),
            (CategoryGroup::Investment.label(), 20),
        ])
    }
}

impl BudgetTargets {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut targets = Self::empty();
        for (category, percent) in pairs {
            targets.set(category, percent);
        }
        targets
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    pub fn get(&self, category: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.percent)
    }

    /// Updates an existing category in place or appends a new one.
    pub fn set(&mut self, category: impl Into<String>, percent: u32) {
        let category = category.into().trim().to_string();
        match self.entries.iter_mut().find(|entry| entry.category == category) {
            Some(entry) => entry.percent = percent,
            None => self.entries.push(TargetEntry { category, percent }),
        }
    }

    pub fn remove(&mut self, category: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.category != category);
        before != self.entries.len()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.percent)).sum()
    }

    pub fn total_status(&self) -> TargetTotal {
        let total = self.total();
        let full = u64::from(FULL_ALLOCATION);
        match total.cmp(&full) {
            std::cmp::Ordering::Equal => TargetTotal::Exact,
            std::cmp::Ordering::Less => TargetTotal::Under(full - total),
            std::cmp::Ordering::Greater => TargetTotal::Over(total - full),
        }
    }

    /// First entry whose percent cannot be a share of income.
    pub fn out_of_range(&self) -> Option<&TargetEntry> {
        self.entries
            .iter()
            .find(|entry| entry.percent > FULL_ALLOCATION)
    }

    /// Saving demands every percent within 0..=100 and a total of exactly 100.
    pub fn validate_for_save(&self) -> Result<()> {
        if let Some(entry) = self.entries.iter().find(|entry| entry.category.is_empty()) {
            return Err(BudgetError::validation(format!(
                "target category cannot be blank (percent {})",
                entry.percent
            )));
        }
        if let Some(entry) = self.out_of_range() {
            return Err(BudgetError::validation(format!(
                "target for {} must be between 0 and 100, got {}",
                entry.category, entry.percent
            )));
        }
        match self.total_status() {
            TargetTotal::Exact => Ok(()),
            TargetTotal::Under(missing) => Err(BudgetError::validation(format!(
                "targets must total exactly 100% ({}% still unallocated)",
                missing
            ))),
            TargetTotal::Over(excess) => Err(BudgetError::validation(format!(
                "targets must total exactly 100% ({}% over)",
                excess
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(variable: u32) -> BudgetTargets {
        BudgetTargets::from_pairs([
            ("Fixos", 40),
            ("Variáveis", variable),
            ("Metas", 10),
            ("Lazer", 10),
            ("Educação", 5),
            ("Investimento", 20),
        ])
    }

    #[test]
    fn defaults_allocate_everything() {
        let defaults = BudgetTargets::default();
        assert_eq!(defaults.total(), 100);
        assert_eq!(defaults.get("Investimento"), Some(20));
        defaults.validate_for_save().unwrap();
    }

    #[test]
    fn over_allocation_is_flagged_and_rejected() {
        let targets = proposal(20);
        assert_eq!(targets.total_status(), TargetTotal::Over(5));
        let err = targets.validate_for_save().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("5% over"));
    }

    #[test]
    fn exact_allocation_passes() {
        let targets = proposal(15);
        assert_eq!(targets.total_status(), TargetTotal::Exact);
        targets.validate_for_save().unwrap();
    }

    #[test]
    fn under_allocation_reports_the_gap() {
        let targets = proposal(5);
        assert_eq!(targets.total_status(), TargetTotal::Under(10));
        assert!(targets.validate_for_save().is_err());
    }

    #[test]
    fn set_replaces_without_reordering() {
        let mut targets = proposal(15);
        targets.set("Metas", 0);
        assert_eq!(targets.entries()[2].category, "Metas");
        assert_eq!(targets.get("Metas"), Some(0));
        assert!(targets.remove("Metas"));
        assert_eq!(targets.get("Metas"), None);
    }

    #[test]
    fn single_percent_above_hundred_is_rejected() {
        let targets = BudgetTargets::from_pairs([("Lazer", 120)]);
        let err = targets.validate_for_save().unwrap_err();
        assert!(err.to_string().contains("between 0 and 100"));
    }

    #[test]
    fn huge_percents_sum_without_wrapping() {
        let targets = BudgetTargets::from_pairs([("Lazer", u32::MAX), ("Metas", u32::MAX)]);
        assert_eq!(targets.total(), 2 * u64::from(u32::MAX));
        assert_eq!(
            targets.total_status(),
            TargetTotal::Over(2 * u64::from(u32::MAX) - 100)
        );
        assert_eq!(targets.out_of_range().map(|e| e.category.as_str()), Some("Lazer"));
        assert!(targets.validate_for_save().is_err());
    }
}
