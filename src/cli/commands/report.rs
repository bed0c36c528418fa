//! `summary` and `balances`.

use chrono::Datelike;

use crate::cli::args::{parse_month_span, ParsedArgs};
use crate::cli::commands::Command;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, section};
use crate::cli::table::{Table, TableColumn};
use crate::core::format::format_percent;
use crate::core::period::{available_years, DateWindow};
use crate::core::services::{CategoryTotal, DashboardSummary, SummaryService};
use crate::domain::{TargetTotal, TransactionFilter};
use crate::storage::LedgerStore;

pub(crate) fn definitions() -> Vec<Command> {
    vec![
        Command::new(
            "summary",
            "Totals, category breakdowns, and budget targets for a period",
            "summary [--year YYYY] [--months M[-M]] | summary --from YYYY-MM-DD --to YYYY-MM-DD",
            cmd_summary,
        ),
        Command::new(
            "balances",
            "Running balance per account",
            "balances [--as-of YYYY-MM-DD]",
            cmd_balances,
        ),
    ]
}

/// Explicit dates win; otherwise a year and month span, defaulting to year to date.
fn window_from(context: &ShellContext, parsed: &ParsedArgs) -> Result<DateWindow, CommandError> {
    let today = context.today();
    match (parsed.date_option("from")?, parsed.date_option("to")?) {
        (Some(start), Some(end)) => return Ok(DateWindow::new(start, end)?),
        (None, None) => {}
        _ => {
            return Err(CommandError::InvalidArguments(
                "--from and --to must be given together".into(),
            ))
        }
    }
    let year: Option<i32> = parsed.parsed_option("year")?;
    if year.is_none() && parsed.option("months").is_none() {
        return Ok(DateWindow::year_to_date(today)?);
    }
    let year = year.unwrap_or(today.year());
    let (start, end) = match parsed.option("months") {
        Some(raw) => parse_month_span(raw)?,
        None if year == today.year() => (1, today.month()),
        None => (1, 12),
    };
    Ok(DateWindow::for_months(year, start, end)?)
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["year", "months", "from", "to"], &[])?;
    let window = window_from(context, &parsed)?;
    let state = &context.state;
    let summary = DashboardSummary::build(&state.store, &state.targets, window, &state.bands())?;

    section(format!("Summary {}", window));
    output::info(format!("Income  : {}", context.money(summary.totals.income)));
    output::info(format!("Expenses: {}", context.money(summary.totals.expense)));
    output::info(format!("Net     : {}", context.money(summary.totals.net)));
    output::info(format!(
        "Spent   : {} of income",
        format_percent(Some(summary.percent_spent))
    ));
    if summary.row_count == 0 {
        let years = available_years(&state.store.query(&TransactionFilter::all())?, context.today());
        output::info(format!(
            "No transactions in this period. Years with data: {}.",
            years
                .iter()
                .map(|year| year.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    print_category_totals(context, "Income by category", &summary.income_by_category);
    print_category_totals(context, "Expenses by category", &summary.expenses_by_category);
    if !summary.expenses_by_subcategory.is_empty() {
        section("Expenses by subcategory");
        let mut table = Table::new(vec![
            TableColumn::left("Category"),
            TableColumn::left("Subcategory"),
            TableColumn::right("Amount"),
        ]);
        for row in &summary.expenses_by_subcategory {
            table.push_row(vec![
                row.category.clone(),
                row.subcategory.clone().unwrap_or_else(|| "-".into()),
                context.money(row.total),
            ]);
        }
        output::line(table.render());
    }

    print_budget(context, &summary);
    print_balances(context, &summary, &format!("Balances up to {}", window.end));
    Ok(())
}

fn print_category_totals(
    context: &ShellContext,
    title: &str,
    totals: &[CategoryTotal],
) {
    if totals.is_empty() {
        return;
    }
    section(title);
    let mut table = Table::new(vec![TableColumn::left("Category"), TableColumn::right("Amount")]);
    for row in totals {
        table.push_row(vec![row.category.clone(), context.money(row.total)]);
    }
    output::line(table.render());
}

fn print_budget(context: &ShellContext, summary: &DashboardSummary) {
    section("Budget: target vs spent");
    match context.state.targets.total_status() {
        TargetTotal::Exact => {}
        TargetTotal::Under(missing) => {
            output::warning(format!("Targets leave {}% of income unallocated.", missing))
        }
        TargetTotal::Over(excess) => {
            output::warning(format!("Targets exceed 100% by {}%.", excess))
        }
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("% Target"),
        TableColumn::right("Target"),
        TableColumn::right("Spent"),
        TableColumn::right("% Income"),
        TableColumn::right("% Used"),
        TableColumn::left("Status"),
    ]);
    for row in &summary.comparison {
        table.push_row(vec![
            row.category.clone(),
            format!("{}%", row.target_percent),
            context.money(row.target_value),
            context.money(row.spent_value),
            format_percent(row.percent_of_income_used),
            format_percent(row.percent_of_target),
            row.band.label().to_string(),
        ]);
    }
    output::line(table.render());

    let alerts = summary.alerts();
    if alerts.is_empty() {
        output::success("No category went over its target.");
    }
    for row in alerts {
        output::warning(format!(
            "{}: {} of target (over).",
            row.category,
            format_percent(row.percent_of_target)
        ));
    }
}

fn print_balances(context: &ShellContext, summary: &DashboardSummary, title: &str) {
    section(title);
    if summary.balances.is_empty() {
        output::info("No rows with an account yet.");
        return;
    }
    let mut table = Table::new(vec![TableColumn::left("Account"), TableColumn::right("Balance")]);
    for entry in &summary.balances {
        table.push_row(vec![entry.account.clone(), context.money(entry.balance)]);
    }
    output::line(table.render());
    output::info(format!("Total: {}", context.money(summary.total_balance)));
}

fn cmd_balances(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["as-of"], &[])?;
    let mut filter = TransactionFilter::all();
    if let Some(cutoff) = parsed.date_option("as-of")? {
        filter = filter.until(cutoff);
    }
    let rows = context.state.store.query(&filter)?;
    let balances = SummaryService::balances_by_account(&rows);

    section("Balances");
    if balances.is_empty() {
        output::info("No rows with an account yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::left("Account"), TableColumn::right("Balance")]);
    for entry in &balances {
        table.push_row(vec![entry.account.clone(), context.money(entry.balance)]);
    }
    output::line(table.render());
    output::info(format!(
        "Total: {}",
        context.money(SummaryService::total_balance(&balances))
    ));
    let positive = SummaryService::accounts_with_positive_balance(&balances);
    if !positive.is_empty() {
        output::info(format!("Accounts with funds: {}", positive.join(", ")));
    }
    Ok(())
}
