use rentbook_config::ConfigError;
use rentbook_core::CoreError;
use thiserror::Error;

/// Failures surfaced by the application facade.
#[derive(Debug, Error)]
pub enum RentbookError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No current billing period. Pin one with `as-of YYYY-MM` or record a payment first.")]
    NoCurrentPeriod,
}

/// Failures that end the command shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] RentbookError),
    #[error("Input error: {0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
