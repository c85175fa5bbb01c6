//! Dispatch, error reporting, and shared helpers for the command shell.

use std::io;

use strsim::levenshtein;

use rentbook_config::ConfigManager;
use rentbook_core::CoreError;

use crate::app::RentbookApp;
use crate::errors::{CliError, RentbookError};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output::{self, OutputPreferences};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    App(#[from] RentbookError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::App(RentbookError::Core(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::App(inner) => CliError::App(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::from_env().map_err(RentbookError::from)?;
        let (app, report) = RentbookApp::open(manager)?;
        output::set_preferences(OutputPreferences {
            color: mode == CliMode::Interactive && app.config().ui_color_enabled,
        });
        if report.created && mode == CliMode::Interactive {
            output::info(format!(
                "Started a new property book `{}`.",
                app.book_name()
            ));
        }
        for warning in &report.warnings {
            output::warning(warning);
        }
        Ok(ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            app,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        match self.app.as_of() {
            Ok(period) => format!("rentbook [{}]> ", period.label()),
            Err(_) => "rentbook> ".to_string(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn currency(&self) -> &str {
        &self.app.config().currency
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(definition) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let handler = definition.handler;
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                if let Some(usage) = self
                    .last_command
                    .as_deref()
                    .and_then(|line| line.split_whitespace().next())
                    .and_then(|name| self.command(&name.to_lowercase()))
                    .map(|definition| definition.usage)
                {
                    output::hint(format!("usage: {usage}"));
                }
                Ok(())
            }
            CommandError::App(RentbookError::NoCurrentPeriod) => {
                output::error(RentbookError::NoCurrentPeriod);
                output::hint("Try `as-of 2081-07`.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}
