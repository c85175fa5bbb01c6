use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "backup",
            "Snapshot the property book",
            "backup [note]",
            cmd_backup,
        ),
        CommandDefinition::new("backups", "List property book backups", "backups", cmd_backups),
        CommandDefinition::new(
            "restore",
            "Restore the property book from a backup",
            "restore <backup id>",
            cmd_restore,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = match args {
        [] => None,
        parts => Some(parts.join(" ")),
    };
    let info = context.app.backup(note.as_deref())?;
    output::success(format!("Backup {} created.", info.id));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.app.backups()?;
    if backups.is_empty() {
        output::info("No backups yet. Create one with `backup`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Backup"),
        TableColumn::left("Created"),
    ]);
    for (idx, backup) in backups.iter().enumerate() {
        table.push(vec![
            (idx + 1).to_string(),
            backup.id.clone(),
            backup.created_at.clone(),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

/// Accepts a backup id or its position in the `backups` listing.
fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: restore <backup id>".into(),
        ));
    };
    let id = match reference.parse::<usize>() {
        Ok(position) if position >= 1 => context
            .app
            .backups()?
            .get(position - 1)
            .map(|backup| backup.id.clone())
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no backup at position {position}"))
            })?,
        _ => reference.to_string(),
    };
    let restored = context.app.restore(&id)?;
    output::success(format!("Restored {}.", restored.id));
    Ok(())
}
