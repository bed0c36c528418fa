mod common;

use std::collections::BTreeSet;

use budget_dashboard::{
    config::FundsPolicy,
    core::services::{Band, DashboardSummary, EntryService, LedgerService},
    core::DateWindow,
    domain::{entry::MAX_AMOUNT, CategoryGroup, Entry, TransactionFilter, TransactionKind},
    storage::LedgerStore,
};
use chrono::NaiveDate;
use common::setup_state;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn january() -> DateWindow {
    DateWindow::for_months(2024, 1, 1).unwrap()
}

#[test]
fn income_and_expense_drive_totals_and_targets() {
    let state = setup_state();
    EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Income {
            date: day(5),
            amount: dec!(1000),
            source: "Salário".into(),
            account: "A".into(),
            description: None,
        },
    )
    .unwrap();
    EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Expense {
            date: day(10),
            amount: dec!(200),
            group: CategoryGroup::FixedCosts,
            subcategory: Some("Aluguel".into()),
            account: "A".into(),
            description: None,
        },
    )
    .unwrap();

    let summary =
        DashboardSummary::build(&state.store, &state.targets, january(), &state.bands()).unwrap();
    assert_eq!(summary.totals.income, dec!(1000));
    assert_eq!(summary.totals.expense, dec!(200));
    assert_eq!(summary.totals.net, dec!(800));
    assert_eq!(summary.percent_spent, dec!(20));

    let fixed = summary
        .comparison
        .iter()
        .find(|row| row.category == "Custos Fixos")
        .unwrap();
    assert_eq!(fixed.target_value, dec!(400));
    assert_eq!(fixed.spent_value, dec!(200));
    assert_eq!(fixed.percent_of_income_used, Some(dec!(20)));
    assert_eq!(fixed.percent_of_target, Some(dec!(50)));
    assert_eq!(fixed.band, Band::UnderTarget);
    assert!(summary.alerts().is_empty());

    let subcategory = &summary.expenses_by_subcategory[0];
    assert_eq!(subcategory.subcategory.as_deref(), Some("Aluguel"));
    assert_eq!(subcategory.total, dec!(200));
}

#[test]
fn transfer_moves_balance_between_accounts() {
    let state = setup_state();
    EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Income {
            date: day(1),
            amount: dec!(500),
            source: "Salário".into(),
            account: "A".into(),
            description: None,
        },
    )
    .unwrap();
    let ids = EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Transfer {
            date: day(2),
            amount: dec!(300),
            from: "A".into(),
            to: "B".into(),
            description: None,
        },
    )
    .unwrap();
    assert_eq!(ids.len(), 2);

    assert_eq!(state.store.account_balance("A", None).unwrap(), dec!(200));
    assert_eq!(state.store.account_balance("B", None).unwrap(), dec!(300));

    let summary =
        DashboardSummary::build(&state.store, &state.targets, january(), &state.bands()).unwrap();
    assert_eq!(summary.totals.expense, dec!(0));
    assert_eq!(summary.total_balance, dec!(500));
    let accounts: Vec<&str> = summary.balances.iter().map(|b| b.account.as_str()).collect();
    assert_eq!(accounts, vec!["A", "B"]);
}

#[test]
fn overdraft_is_rejected_without_writing() {
    let state = setup_state();
    let err = EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Transfer {
            date: day(2),
            amount: dec!(50),
            from: "Empty".into(),
            to: "B".into(),
            description: None,
        },
    )
    .unwrap_err();
    assert!(err.is_validation());
    assert!(state
        .store
        .query(&TransactionFilter::all())
        .unwrap()
        .is_empty());
}

#[test]
fn deleting_one_leg_leaves_an_orphaned_partner() {
    let state = setup_state();
    let ids = EntryService::submit(
        &state.store,
        FundsPolicy::Disabled,
        &Entry::Transfer {
            date: day(3),
            amount: dec!(75),
            from: "A".into(),
            to: "B".into(),
            description: Some("ajuste".into()),
        },
    )
    .unwrap();

    let removed =
        LedgerService::delete(&state.store, &BTreeSet::from([ids[0]]), false).unwrap();
    assert_eq!(removed, 1);

    let rows = state.store.query(&TransactionFilter::all()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, TransactionKind::Transfer);

    let orphans = LedgerService::orphaned_groups(&rows);
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].member_ids, vec![ids[1]]);
}

#[test]
fn strict_delete_refuses_unknown_ids() {
    let state = setup_state();
    let ids = EntryService::submit(
        &state.store,
        FundsPolicy::Disabled,
        &Entry::Income {
            date: day(4),
            amount: dec!(10),
            source: "Outros".into(),
            account: "A".into(),
            description: None,
        },
    )
    .unwrap();

    let request = BTreeSet::from([ids[0], 9_999]);
    assert!(LedgerService::delete(&state.store, &request, true).is_err());
    assert_eq!(state.store.query(&TransactionFilter::all()).unwrap().len(), 1);
    assert_eq!(LedgerService::delete(&state.store, &request, false).unwrap(), 1);
}

#[test]
fn largest_accepted_amounts_still_summarize() {
    let state = setup_state();
    let ceiling = Decimal::from(MAX_AMOUNT);
    let huge_income = |amount| Entry::Income {
        date: day(6),
        amount,
        source: "Salário".into(),
        account: "A".into(),
        description: None,
    };
    assert!(EntryService::submit(&state.store, FundsPolicy::AllMoves, &huge_income(dec!(1e27)))
        .unwrap_err()
        .is_validation());

    EntryService::submit(&state.store, FundsPolicy::AllMoves, &huge_income(ceiling)).unwrap();
    EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Expense {
            date: day(7),
            amount: ceiling,
            group: CategoryGroup::Leisure,
            subcategory: None,
            account: "A".into(),
            description: None,
        },
    )
    .unwrap();

    let summary =
        DashboardSummary::build(&state.store, &state.targets, january(), &state.bands()).unwrap();
    assert_eq!(summary.percent_spent, dec!(100));
    assert_eq!(summary.total_balance, Decimal::ZERO);
    let leisure = summary
        .comparison
        .iter()
        .find(|row| row.category == "Lazer")
        .unwrap();
    assert_eq!(leisure.band, Band::OverTarget);
}
