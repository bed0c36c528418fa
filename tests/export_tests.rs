mod common;

use budget_dashboard::{
    config::FundsPolicy,
    core::services::{EntryService, ExportService, LedgerService},
    domain::{Entry, TransactionFilter, TransactionKind},
};
use chrono::NaiveDate;
use common::{setup_state, temp_base};
use rust_decimal_macros::dec;

#[test]
fn export_writes_filtered_rows_newest_first() {
    let state = setup_state();
    let date = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
    EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Income {
            date: date(1),
            amount: dec!(1500.25),
            source: "Freelancer".into(),
            account: "NuBank".into(),
            description: Some("projeto, fase 1".into()),
        },
    )
    .unwrap();
    EntryService::submit(
        &state.store,
        FundsPolicy::AllMoves,
        &Entry::Transfer {
            date: date(2),
            amount: dec!(500),
            from: "NuBank".into(),
            to: "Caixa".into(),
            description: None,
        },
    )
    .unwrap();

    let path = temp_base().join("exports").join("fevereiro.csv");
    let rows = LedgerService::list(
        &state.store,
        &TransactionFilter::all().kind(TransactionKind::Transfer),
    )
    .unwrap();
    ExportService::export_to_path(&rows, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "id,date,type,category,amount,account,description,reconciled,transfer_group_id"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains(",500,Caixa,,false,"));
    assert!(lines[2].contains(",-500,NuBank,,false,"));

    let everything = LedgerService::list(&state.store, &TransactionFilter::all()).unwrap();
    let mut buffer = Vec::new();
    ExportService::write_csv(&everything, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.contains("\"projeto, fase 1\""));
    assert!(text.contains("1500.25"));
}
