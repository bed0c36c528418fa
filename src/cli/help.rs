use crate::cli::commands::{Command, CommandTable};
use crate::cli::output::{self, section as output_section};

pub fn print_overview(commands: &CommandTable) {
    output_section("Available commands");
    for command in commands.iter() {
        output::info(format!("  {:<12} {}", command.name, command.summary));
    }
    output::info("Use `help <command>` for details.");
    output::info("Dates use YYYY-MM-DD; amounts use a dot for decimals.");
}

pub fn print_command(command: &Command) {
    output_section(format!("Help: {}", command.name));
    output::info(format!("  Description: {}", command.summary));
    output::info(format!("  Usage: {}", command.usage));
}
