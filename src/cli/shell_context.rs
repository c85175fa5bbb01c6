use crate::app::RentbookApp;

use super::commands::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach: the open book, settings, and the registry.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub app: RentbookApp,
    pub last_command: Option<String>,
    pub running: bool,
}
