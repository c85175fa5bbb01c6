use rentbook_config::Config;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, OutputPreferences};

use super::CommandDefinition;

const USAGE: &str = "config [show | get <key> | set <key> <value> | backup [note] | backups | restore <name>]";

/// Keys read only when the book is opened.
const RESTART_KEYS: [&str; 3] = ["data_root", "book_name", "backup_retention"];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change settings",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show(context.app.config()),
        ["get", key] => {
            let value = context.app.config().get(key).map_err(app_error)?;
            output::info(format!("{key} = {value}"));
        }
        ["set", key, value] => {
            context.app.set_config_value(key, value)?;
            output::success(format!(
                "{key} = {}",
                context.app.config().get(key).map_err(app_error)?
            ));
            if *key == "ui_color_enabled" {
                output::set_preferences(OutputPreferences {
                    color: context.mode == CliMode::Interactive
                        && context.app.config().ui_color_enabled,
                });
            }
            if RESTART_KEYS.contains(key) {
                output::hint("Takes effect the next time the shell starts.");
            }
        }
        ["backup"] | ["backup", _] => {
            let manager = context.app.config_manager();
            let name = manager
                .backup(context.app.config(), args.get(1).copied())
                .map_err(app_error)?;
            output::success(format!("Configuration saved to {name}."));
        }
        ["backups"] => {
            let names = context
                .app
                .config_manager()
                .list_backups()
                .map_err(app_error)?;
            if names.is_empty() {
                output::info("No configuration backups.");
            }
            for name in names {
                output::info(format!("  {name}"));
            }
        }
        ["restore", name] => {
            context.app.restore_config(name)?;
            output::success(format!("Configuration restored from {name}."));
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
        }
    }
    Ok(())
}

fn show(config: &Config) {
    output::section("Configuration");
    for key in Config::KEYS {
        if let Ok(value) = config.get(key) {
            output::info(format!("  {key:<18} {value}"));
        }
    }
}

fn app_error(err: rentbook_config::ConfigError) -> CommandError {
    CommandError::App(err.into())
}
