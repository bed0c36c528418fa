use crate::cli::commands::Command;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output::{self, section};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<Command> {
    vec![
        Command::new(
            "version",
            "Show build metadata",
            "version",
            cmd_version,
        ),
        Command::new("help", "Show available commands", "help [command]", cmd_help),
        Command::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    section("Build information");
    output::info(format!("Version: {}", meta.version));
    output::info(format!("Commit: {} ({})", meta.git_hash, meta.git_status));
    output::info(format!("Built: {}", meta.timestamp));
    output::info(format!("Target: {} [{}]", meta.target, meta.profile));
    output::info(format!("Rustc: {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => {
            help::print_overview(&context.commands);
            Ok(())
        }
        Some(name) => {
            let name = name.to_lowercase();
            match context.command(&name) {
                Some(entry) => help::print_command(entry),
                None => context.suggest_command(&name),
            }
            Ok(())
        }
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
