//! Ledger maintenance: listing, deleting by id, and spotting broken transfer pairs.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::errors::{BudgetError, Result};
use crate::domain::{Transaction, TransactionFilter, TransactionId};
use crate::storage::LedgerStore;

/// A transfer group that no longer holds a balanced pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedGroup {
    pub group: Uuid,
    pub member_ids: Vec<TransactionId>,
    pub sum: Decimal,
}

pub struct LedgerService;

impl LedgerService {
    pub fn list<S>(store: &S, filter: &TransactionFilter) -> Result<Vec<Transaction>>
    where
        S: LedgerStore + ?Sized,
    {
        store.query(filter)
    }

    /// Deletes exactly the given ids; partners of grouped rows are left alone.
    /// With `strict`, any unknown id fails the whole request before deleting.
    pub fn delete<S>(store: &S, ids: &BTreeSet<TransactionId>, strict: bool) -> Result<usize>
    where
        S: LedgerStore + ?Sized,
    {
        if ids.is_empty() {
            return Ok(0);
        }
        if strict {
            let existing = store.existing_ids(ids)?;
            let missing: Vec<String> = ids
                .difference(&existing)
                .map(|id| id.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(BudgetError::NotFound(format!(
                    "transaction id(s) {}",
                    missing.join(", ")
                )));
            }
        }
        let removed = store.delete(ids)?;
        if removed < ids.len() {
            warn!(requested = ids.len(), removed, "some ids were not present");
        } else {
            info!(removed, "transactions removed");
        }
        Ok(removed)
    }

    /// Members of the groups touched by `rows` that survive deleting `ids`.
    pub fn kept_partners<S>(
        store: &S,
        rows: &[Transaction],
        ids: &BTreeSet<TransactionId>,
    ) -> Result<Vec<Transaction>>
    where
        S: LedgerStore + ?Sized,
    {
        let groups: BTreeSet<Uuid> = rows.iter().filter_map(|txn| txn.transfer_group_id).collect();
        let mut partners = Vec::new();
        for group in groups {
            partners.extend(
                store
                    .group_members(group)?
                    .into_iter()
                    .filter(|txn| !ids.contains(&txn.id)),
            );
        }
        Ok(partners)
    }

    /// Groups whose member count is not two or whose amounts do not cancel.
    pub fn orphaned_groups(rows: &[Transaction]) -> Vec<OrphanedGroup> {
        let mut groups: BTreeMap<Uuid, (Vec<TransactionId>, Decimal)> = BTreeMap::new();
        for txn in rows {
            if let Some(group) = txn.transfer_group_id {
                let entry = groups.entry(group).or_default();
                entry.0.push(txn.id);
                entry.1 += txn.amount;
            }
        }
        groups
            .into_iter()
            .filter(|(_, (ids, sum))| ids.len() != 2 || !sum.is_zero())
            .map(|(group, (mut member_ids, sum))| {
                member_ids.sort_unstable();
                OrphanedGroup {
                    group,
                    member_ids,
                    sum,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTransaction, TransactionKind};
    use crate::storage::SqliteStorage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn leg(id: TransactionId, amount: Decimal, group: Uuid) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Transaction::from_new(
            id,
            NewTransaction::new(TransactionKind::Transfer, date, amount, "Transferência")
                .with_group(group),
        )
    }

    #[test]
    fn balanced_pairs_are_not_orphans() {
        let group = Uuid::new_v4();
        let rows = vec![leg(1, dec!(-10), group), leg(2, dec!(10), group)];
        assert!(LedgerService::orphaned_groups(&rows).is_empty());
    }

    #[test]
    fn lone_leg_is_reported() {
        let kept = Uuid::new_v4();
        let broken = Uuid::new_v4();
        let rows = vec![
            leg(1, dec!(-10), kept),
            leg(2, dec!(10), kept),
            leg(4, dec!(25), broken),
        ];
        let orphans = LedgerService::orphaned_groups(&rows);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].group, broken);
        assert_eq!(orphans[0].member_ids, vec![4]);
        assert_eq!(orphans[0].sum, dec!(25));
    }

    #[test]
    fn deleting_one_leg_reports_the_surviving_partner() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStorage::open(dir.path().join("budget.db")).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let group = Uuid::new_v4();
        let pair = store
            .insert_group(&[
                NewTransaction::new(TransactionKind::Transfer, date, dec!(-10), "Transferência")
                    .with_account("A")
                    .with_group(group),
                NewTransaction::new(TransactionKind::Transfer, date, dec!(10), "Transferência")
                    .with_account("B")
                    .with_group(group),
            ])
            .unwrap();

        let ids: BTreeSet<TransactionId> = [pair[0]].into_iter().collect();
        let matched: Vec<Transaction> = store
            .query(&TransactionFilter::all())
            .unwrap()
            .into_iter()
            .filter(|txn| ids.contains(&txn.id))
            .collect();
        let partners = LedgerService::kept_partners(&store, &matched, &ids).unwrap();
        assert_eq!(partners.len(), 1);
        assert_eq!(partners[0].id, pair[1]);

        let both: BTreeSet<TransactionId> = pair.iter().copied().collect();
        assert!(LedgerService::kept_partners(&store, &matched, &both)
            .unwrap()
            .is_empty());
    }
}
