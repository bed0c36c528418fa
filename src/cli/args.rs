//! Positional arguments plus `--name value` options for shell commands.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cli::core::CommandError;
use crate::domain::TransactionId;

#[derive(Debug, Default)]
pub struct ParsedArgs {
    positional: Vec<String>,
    options: HashMap<String, String>,
    flags: BTreeSet<String>,
}

impl ParsedArgs {
    /// `flags` lists the option names that take no value. Every other `--name`
    /// consumes the following token (or the part after `=`).
    pub fn parse(args: &[&str], options: &[&str], flags: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(token) = iter.next() {
            let Some(name) = token.strip_prefix("--").filter(|name| !name.is_empty()) else {
                parsed.positional.push(token.to_string());
                continue;
            };
            let (name, inline) = match name.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (name, None),
            };
            if flags.contains(&name) {
                parsed.flags.insert(name.to_string());
            } else if options.contains(&name) {
                let value = match inline {
                    Some(value) => value,
                    None => iter.next().map(|value| value.to_string()).ok_or_else(|| {
                        CommandError::InvalidArguments(format!("missing value for --{}", name))
                    })?,
                };
                parsed.options.insert(name.to_string(), value);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option --{}",
                    name
                )));
            }
        }
        Ok(parsed)
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn required(&self, idx: usize, what: &str) -> Result<&str, CommandError> {
        self.positional
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing {}", what)))
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn date_option(&self, name: &str) -> Result<Option<NaiveDate>, CommandError> {
        self.option(name).map(parse_date).transpose()
    }

    pub fn parsed_option<T: FromStr>(&self, name: &str) -> Result<Option<T>, CommandError> {
        self.option(name)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|_| {
                    CommandError::InvalidArguments(format!("invalid value `{}` for --{}", raw, name))
                })
            })
            .transpose()
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Accepts `1234.56` and `1234,56`.
pub fn parse_amount(input: &str) -> Result<Decimal, CommandError> {
    let normalized = input.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

pub fn parse_ids(inputs: &[String]) -> Result<BTreeSet<TransactionId>, CommandError> {
    inputs
        .iter()
        .map(|raw| {
            raw.trim().parse::<TransactionId>().map_err(|_| {
                CommandError::InvalidArguments(format!("invalid transaction id `{}`", raw))
            })
        })
        .collect()
}

/// `3` or `1-3`.
pub fn parse_month_span(input: &str) -> Result<(u32, u32), CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("invalid month range `{}`", input));
    let (start, end) = match input.split_once('-') {
        Some((start, end)) => (start, end),
        None => (input, input),
    };
    let start = start.trim().parse().map_err(|_| invalid())?;
    let end = end.trim().parse().map_err(|_| invalid())?;
    Ok((start, end))
}
