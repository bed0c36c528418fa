pub mod entry;
pub mod ledger;
pub mod report;
pub mod settings;
pub mod system;

use crate::cli::core::{CommandResult, ShellContext};

pub type Handler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A shell command with its help text.
pub struct Command {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub run: Handler,
}

impl Command {
    pub(crate) const fn new(
        name: &'static str,
        summary: &'static str,
        usage: &'static str,
        run: Handler,
    ) -> Self {
        Self {
            name,
            summary,
            usage,
            run,
        }
    }
}

/// Built-in commands in the order `help` lists them.
pub struct CommandTable {
    commands: Vec<Command>,
}

impl CommandTable {
    pub fn builtin() -> Self {
        Self::from_groups([
            entry::definitions(),
            ledger::definitions(),
            report::definitions(),
            settings::definitions(),
            system::definitions(),
        ])
    }

    /// A repeated name replaces the earlier command in its original slot.
    fn from_groups(groups: impl IntoIterator<Item = Vec<Command>>) -> Self {
        let mut commands: Vec<Command> = Vec::new();
        for command in groups.into_iter().flatten() {
            match commands.iter_mut().find(|known| known.name == command.name) {
                Some(slot) => *slot = command,
                None => commands.push(command),
            }
        }
        Self { commands }
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> + '_ {
        self.commands.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|command| command.name)
    }
}
