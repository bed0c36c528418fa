//! Dispatch, error reporting, and shell context helpers.

use std::io;

use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Confirm};
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::debug;

use crate::core::app_state::AppState;
use crate::core::errors::BudgetError;
use crate::core::format::format_currency;
pub use crate::core::errors::CliError;

use super::commands::{Command, CommandTable};
use super::output::{self, set_preferences, OutputPreferences};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_state(mode, AppState::load()?)
    }

    pub fn with_state(mode: CliMode, state: AppState) -> Result<Self, CliError> {
        set_preferences(OutputPreferences {
            plain_mode: mode == CliMode::Script,
        });

        Ok(ShellContext {
            mode,
            commands: CommandTable::builtin(),
            state,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub(crate) fn command(&self, name: &str) -> Option<&Command> {
        self.commands.find(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.commands.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        "budget> ".to_string()
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(crate) fn money(&self, amount: Decimal) -> String {
        format_currency(&self.state.config.currency_symbol, amount)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(run) = self.commands.find(command).map(|entry| entry.run) {
            debug!(command, args = args.len(), "dispatching command");
            match run(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .commands
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Script mode never blocks on a prompt and answers yes.
    pub(crate) fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(BudgetError::Validation(message)) => {
                output::error(message);
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn script_context(base: &std::path::Path) -> ShellContext {
    let state = AppState::with_base_dir(base.to_path_buf()).unwrap();
    ShellContext::with_state(CliMode::Script, state).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TransactionFilter, TransactionKind};
    use crate::storage::LedgerStore;
    use tempfile::TempDir;

    fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            if let Err(err) = context.process_line(line) {
                context.report_error(err).unwrap();
            }
        }
    }

    #[test]
    fn entries_flow_into_the_store() {
        let dir = TempDir::new().unwrap();
        let mut context = script_context(dir.path());
        run(
            &mut context,
            &[
                "income 1000 Salário A --date 2024-01-05",
                "expense 200 fixed-costs A --sub Aluguel --date 2024-01-10",
                "transfer 300 A B --date 2024-01-12",
            ],
        );
        let rows = context.state.store.query(&TransactionFilter::all()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows.iter()
                .filter(|txn| txn.kind == TransactionKind::Transfer)
                .count(),
            2
        );
    }

    #[test]
    fn rejected_entry_keeps_the_shell_running() {
        let dir = TempDir::new().unwrap();
        let mut context = script_context(dir.path());
        let err = context.process_line("transfer 0 A B").unwrap_err();
        assert!(matches!(err, CommandError::Core(ref inner) if inner.is_validation()));
        assert!(context.running);
        assert!(matches!(
            context.process_line("exit").unwrap(),
            LoopControl::Exit
        ));
    }

    #[test]
    fn unknown_commands_continue() {
        let dir = TempDir::new().unwrap();
        let mut context = script_context(dir.path());
        assert!(matches!(
            context.process_line("sumary").unwrap(),
            LoopControl::Continue
        ));
    }
}
