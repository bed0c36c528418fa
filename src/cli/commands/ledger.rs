//! `list`, `delete`, `export`, and `check`.

use std::path::PathBuf;

use crate::cli::args::{parse_ids, ParsedArgs};
use crate::cli::commands::Command;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{ExportService, LedgerService};
use crate::domain::common::Displayable;
use crate::domain::{Transaction, TransactionFilter, TransactionKind};
use crate::storage::LedgerStore;

const FILTER_OPTIONS: &[&str] = &["from", "to", "type", "account", "limit"];

pub(crate) fn definitions() -> Vec<Command> {
    vec![
        Command::new(
            "list",
            "List ledger rows, newest first",
            "list [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--type kind] [--account name] [--limit n]",
            cmd_list,
        ),
        Command::new(
            "delete",
            "Delete rows by id (transfer partners are not removed)",
            "delete <id>... [--yes]",
            cmd_delete,
        ),
        Command::new(
            "export",
            "Write ledger rows to a CSV file",
            "export <path> [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--type kind] [--account name]",
            cmd_export,
        ),
        Command::new(
            "check",
            "Report transfer groups that lost their partner row",
            "check",
            cmd_check,
        ),
    ]
}

fn filter_from(parsed: &ParsedArgs) -> Result<TransactionFilter, CommandError> {
    let mut filter = TransactionFilter::all();
    if let Some(start) = parsed.date_option("from")? {
        filter = filter.since(start);
    }
    if let Some(end) = parsed.date_option("to")? {
        filter = filter.until(end);
    }
    if let Some(raw) = parsed.option("type") {
        let kind = raw
            .parse::<TransactionKind>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        filter = filter.kind(kind);
    }
    if let Some(account) = parsed.option("account") {
        filter = filter.account(account);
    }
    Ok(filter)
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, FILTER_OPTIONS, &[])?;
    let filter = filter_from(&parsed)?;
    let limit: Option<usize> = parsed.parsed_option("limit")?;

    let rows = LedgerService::list(&context.state.store, &filter)?;
    if rows.is_empty() {
        output::info("No transactions match.");
        return Ok(());
    }
    let shown = limit.unwrap_or(rows.len()).min(rows.len());
    output::line(transactions_table(context, &rows[..shown]).render());
    if shown < rows.len() {
        output::info(format!("Showing {} of {} rows.", shown, rows.len()));
    }
    Ok(())
}

fn transactions_table(context: &ShellContext, rows: &[Transaction]) -> Table {
    let mut table = Table::new(vec![
        TableColumn::right("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::left("Category").max_width(20),
        TableColumn::left("Subcategory").max_width(20),
        TableColumn::right("Amount"),
        TableColumn::left("Account"),
        TableColumn::left("Description").max_width(24),
        TableColumn::left("Group"),
    ]);
    for txn in rows {
        table.push_row(vec![
            txn.id.to_string(),
            txn.date.to_string(),
            txn.kind.to_string(),
            txn.category.clone(),
            txn.subcategory.clone().unwrap_or_default(),
            context.money(txn.amount),
            txn.account.clone().unwrap_or_default(),
            txn.description.clone().unwrap_or_default(),
            txn.transfer_group_id
                .map(|group| group.simple().to_string()[..8].to_string())
                .unwrap_or_default(),
        ]);
    }
    table
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    if parsed.positional().is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: delete <id>... [--yes]".into(),
        ));
    }
    let ids = parse_ids(parsed.positional())?;

    let matched: Vec<Transaction> = context
        .state
        .store
        .query(&TransactionFilter::all())?
        .into_iter()
        .filter(|txn| ids.contains(&txn.id))
        .collect();
    for txn in &matched {
        output::info(txn.display_label());
    }
    for partner in LedgerService::kept_partners(&context.state.store, &matched, &ids)? {
        output::hint(format!("Partner row stays: {}", partner.display_label()));
    }

    if context.mode == CliMode::Interactive && !parsed.flag("yes") {
        let prompt = format!("Delete {} transaction(s)?", ids.len());
        if !context.confirm(&prompt, false)? {
            output::info("Nothing deleted.");
            return Ok(());
        }
    }

    let state = &context.state;
    let removed = LedgerService::delete(&state.store, &ids, state.config.strict_delete)?;
    output::success(format!("Deleted {} transaction(s).", removed));

    let orphans = LedgerService::orphaned_groups(&state.store.query(&TransactionFilter::all())?);
    if !orphans.is_empty() {
        output::warning(format!(
            "{} transfer group(s) are missing a leg. Run `check` for details.",
            orphans.len()
        ));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["from", "to", "type", "account"], &[])?;
    let path = PathBuf::from(parsed.required(0, "output path")?);
    let filter = filter_from(&parsed)?;

    let rows = LedgerService::list(&context.state.store, &filter)?;
    ExportService::export_to_path(&rows, &path)?;
    output::success(format!(
        "Exported {} row(s) to {}.",
        rows.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_check(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context.state.store.query(&TransactionFilter::all())?;
    let orphans = LedgerService::orphaned_groups(&rows);
    if orphans.is_empty() {
        output::success("All transfer groups are balanced pairs.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Group"),
        TableColumn::left("Rows"),
        TableColumn::right("Sum"),
    ]);
    for orphan in &orphans {
        table.push_row(vec![
            orphan.group.to_string(),
            orphan
                .member_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            context.money(orphan.sum),
        ]);
    }
    output::warning(format!("{} unbalanced transfer group(s).", orphans.len()));
    output::line(table.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::script_context;
    use tempfile::TempDir;

    #[test]
    fn type_option_accepts_kind_names_and_labels() {
        let parsed = ParsedArgs::parse(&["--type", "Transferência"], FILTER_OPTIONS, &[]).unwrap();
        assert_eq!(
            filter_from(&parsed).unwrap().kind,
            Some(TransactionKind::Transfer)
        );

        let parsed = ParsedArgs::parse(&["--type", "gift"], FILTER_OPTIONS, &[]).unwrap();
        assert!(matches!(
            filter_from(&parsed),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn deleting_one_transfer_leg_keeps_its_partner() {
        let dir = TempDir::new().unwrap();
        let mut context = script_context(dir.path());
        context
            .process_line("income 100 Salário A --date 2024-01-05")
            .unwrap();
        context
            .process_line("transfer 40 A B --date 2024-01-06")
            .unwrap();
        let legs = context
            .state
            .store
            .query(&TransactionFilter::all().kind(TransactionKind::Transfer))
            .unwrap();
        assert_eq!(legs.len(), 2);

        context
            .process_line(&format!("delete {} --yes", legs[0].id))
            .unwrap();
        let left = context
            .state
            .store
            .query(&TransactionFilter::all().kind(TransactionKind::Transfer))
            .unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, legs[1].id);
    }
}
