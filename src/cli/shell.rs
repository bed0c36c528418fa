use std::io::{self, BufRead};

use rustyline::{
    completion::Completer, error::ReadlineError, highlight::Highlighter, hint::Hinter,
    history::DefaultHistory, validate::Validator, Cmd, Context as ReadlineContext, Editor, Helper,
    KeyEvent,
};
use tracing::info;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::utils::build_info;

pub const SCRIPT_ENV: &str = "BUDGET_DASHBOARD_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    info!(?mode, "shell started");

    match mode {
        CliMode::Interactive => {
            let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
            editor.set_helper(Some(CommandCompleter::new(context.command_names())));
            editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
            output::info(format!(
                "Budget dashboard {}. Type `help` to list commands.",
                build_info::current().short_label()
            ));
            drive(&mut context, &mut Prompted { editor })
        }
        CliMode::Script => drive(&mut context, &mut Piped::new(io::stdin().lock())),
    }
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

/// Where the shell reads its next command line from.
trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError>;
}

struct Prompted {
    editor: Editor<CommandCompleter, DefaultHistory>,
}

impl LineSource for Prompted {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(Input::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Newline-separated commands; `#` starts a comment line.
struct Piped<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> Piped<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for Piped<R> {
    fn next_line(&mut self, _prompt: &str) -> Result<Input, CliError> {
        for line in self.lines.by_ref() {
            let line = line?;
            if !line.trim_start().starts_with('#') {
                return Ok(Input::Line(line));
            }
        }
        Ok(Input::Closed)
    }
}

fn drive(context: &mut ShellContext, source: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        match source.next_line(&context.prompt())? {
            Input::Line(line) => match handle_line(context, line.trim()) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err)?,
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => break,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Shell-style word splitting, so quoted descriptions stay one argument.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// Completes the command word against the registered names.
struct CommandCompleter {
    names: Vec<&'static str>,
}

impl CommandCompleter {
    fn new(mut names: Vec<&'static str>) -> Self {
        names.sort_unstable();
        names.dedup();
        Self { names }
    }
}

impl Helper for CommandCompleter {}
impl Hinter for CommandCompleter {
    type Hint = String;
}
impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}

impl Completer for CommandCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let typed = &line[..pos];
        let start = typed.len() - typed.trim_start().len();
        let word = &typed[start..];
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let word = word.to_ascii_lowercase();
        let matches = self
            .names
            .iter()
            .filter(|name| name.starts_with(&word))
            .map(|name| name.to_string())
            .collect();
        Ok((start, matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::script_context;
    use crate::domain::TransactionFilter;
    use crate::storage::LedgerStore;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line("expense 10 'fixed-costs' A --desc \"conta de luz\"").unwrap();
        assert_eq!(tokens.last().map(String::as_str), Some("conta de luz"));
        assert!(parse_command_line("income 'unterminated").is_err());
    }

    #[test]
    fn piped_script_skips_comments_and_stops_at_exit() {
        let dir = TempDir::new().unwrap();
        let mut context = script_context(dir.path());
        let script = "\
# seed the ledger
income 100 Salário A --date 2024-01-05

transfer 0 A B
income 'broken
exit
income 50 Salário A --date 2024-01-06
";
        drive(&mut context, &mut Piped::new(Cursor::new(script))).unwrap();

        assert!(!context.running);
        let rows = context.state.store.query(&TransactionFilter::all()).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
