use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Rentbook {meta}"));
    output::info(format!(
        "  Schema ver  : v{}",
        rentbook_domain::CURRENT_SCHEMA_VERSION
    ));
    output::info(format!("  Commit      : {}", meta.commit));
    output::info(format!("  Built on    : {}", meta.built_on));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(definition) => {
                output::section(definition.name);
                output::info(definition.description);
                output::hint(format!("usage: {}", definition.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Commands");
    let width = context
        .registry
        .names()
        .map(str::len)
        .max()
        .unwrap_or_default();
    for definition in context.registry.iter() {
        output::info(format!(
            "  {:<width$}  {}",
            definition.name, definition.description
        ));
    }
    output::hint("Type `help <command>` for usage details.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
