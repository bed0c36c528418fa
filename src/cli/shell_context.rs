use dialoguer::theme::ColorfulTheme;

use crate::core::app_state::AppState;

use super::commands::CommandTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub commands: CommandTable,
    pub state: AppState,
    pub theme: ColorfulTheme,
    pub running: bool,
}
