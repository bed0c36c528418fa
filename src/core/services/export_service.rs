//! CSV export of ledger rows.

use std::{fs::File, io::Write, path::Path};

use tracing::info;

use crate::core::errors::Result;
use crate::core::utils::ensure_dir;
use crate::domain::Transaction;

pub const CSV_HEADER: [&str; 9] = [
    "id",
    "date",
    "type",
    "category",
    "amount",
    "account",
    "description",
    "reconciled",
    "transfer_group_id",
];

pub struct ExportService;

impl ExportService {
    /// Writes a header plus one record per row, in the order given.
    pub fn write_csv<W: Write>(rows: &[Transaction], writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(CSV_HEADER)?;
        for txn in rows {
            csv.write_record([
                txn.id.to_string(),
                txn.date.to_string(),
                txn.kind.as_str().to_string(),
                txn.category.clone(),
                txn.amount.to_string(),
                txn.account.clone().unwrap_or_default(),
                txn.description.clone().unwrap_or_default(),
                txn.reconciled.to_string(),
                txn.transfer_group_id
                    .map(|group| group.to_string())
                    .unwrap_or_default(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn export_to_path(rows: &[Transaction], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let file = File::create(path)?;
        Self::write_csv(rows, file)?;
        info!(path = %path.display(), rows = rows.len(), "ledger exported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTransaction, TransactionKind};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_export_is_header_only() {
        let mut out = Vec::new();
        ExportService::write_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,date,type,category,amount,account,description,reconciled,transfer_group_id\n"
        );
    }

    #[test]
    fn null_fields_become_empty_cells() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let row = Transaction::from_new(
            7,
            NewTransaction::new(TransactionKind::Expense, date, dec!(-12.50), "Lazer, Cinema"),
        );
        let mut out = Vec::new();
        ExportService::write_csv(&[row], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let record = text.lines().nth(1).unwrap();
        assert_eq!(record, "7,2024-03-01,Expense,\"Lazer, Cinema\",-12.50,,,false,");
    }
}
