mod args;
pub mod commands;
pub mod core;
mod format;
pub mod output;
mod shell;
mod shell_context;
mod table;

pub use shell::run_cli;
