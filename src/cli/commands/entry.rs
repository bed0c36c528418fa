//! `income`, `expense`, `invest`, and `transfer`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cli::args::{parse_amount, ParsedArgs};
use crate::cli::commands::Command;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::EntryService;
use crate::domain::{CategoryGroup, Entry, TransactionId};

const ENTRY_OPTIONS: &[&str] = &["date", "desc"];

pub(crate) fn definitions() -> Vec<Command> {
    vec![
        Command::new(
            "income",
            "Record income into an account",
            "income <amount> <source> <account> [--date YYYY-MM-DD] [--desc text]",
            cmd_income,
        ),
        Command::new(
            "expense",
            "Record an expense against a budget group",
            "expense <amount> <group> <account> [--sub subcategory] [--date YYYY-MM-DD] [--desc text]",
            cmd_expense,
        ),
        Command::new(
            "invest",
            "Record an investment, optionally moving funds to another account",
            "invest <amount> <asset> <account> [--to account] [--date YYYY-MM-DD] [--desc text]",
            cmd_invest,
        ),
        Command::new(
            "transfer",
            "Move money between two accounts",
            "transfer <amount> <from> <to> [--date YYYY-MM-DD] [--desc text]",
            cmd_transfer,
        ),
    ]
}

/// Fields every entry command shares.
struct Common {
    amount: Decimal,
    date: NaiveDate,
    description: Option<String>,
}

fn common(context: &ShellContext, parsed: &ParsedArgs) -> Result<Common, CommandError> {
    Ok(Common {
        amount: parse_amount(parsed.required(0, "amount")?)?,
        date: parsed.date_option("date")?.unwrap_or_else(|| context.today()),
        description: parsed.option("desc").map(str::to_string),
    })
}

fn submit(context: &ShellContext, entry: &Entry) -> Result<Vec<TransactionId>, CommandError> {
    let state = &context.state;
    Ok(EntryService::submit(&state.store, state.config.funds_policy, entry)?)
}

fn warn_unlisted(context: &ShellContext, group: CategoryGroup, label: &str) {
    if !context.state.categories.contains(group, label.trim()) {
        output::warning(format!(
            "`{}` is not a configured {} category.",
            label.trim(),
            group
        ));
    }
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ENTRY_OPTIONS, &[])?;
    let common = common(context, &parsed)?;
    let source = parsed.required(1, "income source")?.to_string();
    let account = parsed.required(2, "account")?.to_string();

    let entry = Entry::Income {
        date: common.date,
        amount: common.amount,
        source: source.clone(),
        account: account.clone(),
        description: common.description,
    };
    let ids = submit(context, &entry)?;
    warn_unlisted(context, CategoryGroup::Income, &source);
    output::success(format!(
        "Income of {} recorded in {} (id {}).",
        context.money(common.amount),
        account,
        join_ids(&ids)
    ));
    Ok(())
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "desc", "sub"], &[])?;
    let common = common(context, &parsed)?;
    let group: CategoryGroup = parsed.required(1, "expense group")?.parse()?;
    let account = parsed.required(2, "account")?.to_string();
    let subcategory = parsed.option("sub").map(str::to_string);

    let entry = Entry::Expense {
        date: common.date,
        amount: common.amount,
        group,
        subcategory: subcategory.clone(),
        account: account.clone(),
        description: common.description,
    };
    let ids = submit(context, &entry)?;
    if let Some(subcategory) = subcategory.as_deref() {
        warn_unlisted(context, group, subcategory);
    }
    output::success(format!(
        "Expense of {} recorded under {} from {} (id {}).",
        context.money(common.amount),
        group,
        account,
        join_ids(&ids)
    ));
    Ok(())
}

fn cmd_invest(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "desc", "to"], &[])?;
    let common = common(context, &parsed)?;
    let asset = parsed.required(1, "investment type")?.to_string();
    let account = parsed.required(2, "account")?.to_string();
    let destination = parsed.option("to").map(str::to_string);

    let entry = Entry::Investment {
        date: common.date,
        amount: common.amount,
        asset: asset.clone(),
        account: account.clone(),
        destination: destination.clone(),
        description: common.description,
    };
    let ids = submit(context, &entry)?;
    warn_unlisted(context, CategoryGroup::Investment, &asset);
    let target = match destination {
        Some(destination) => format!("{} → {}", account, destination),
        None => account,
    };
    output::success(format!(
        "Investment of {} in {} recorded ({}, id {}).",
        context.money(common.amount),
        asset,
        target,
        join_ids(&ids)
    ));
    Ok(())
}

fn cmd_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ENTRY_OPTIONS, &[])?;
    let common = common(context, &parsed)?;
    let from = parsed.required(1, "source account")?.to_string();
    let to = parsed.required(2, "destination account")?.to_string();

    let entry = Entry::Transfer {
        date: common.date,
        amount: common.amount,
        from: from.clone(),
        to: to.clone(),
        description: common.description,
    };
    let ids = submit(context, &entry)?;
    output::success(format!(
        "Transfer of {} recorded: {} → {} (ids {}).",
        context.money(common.amount),
        from,
        to,
        join_ids(&ids)
    ));
    Ok(())
}

fn join_ids(ids: &[TransactionId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
