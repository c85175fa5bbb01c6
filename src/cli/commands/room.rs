use rust_decimal::Decimal;

use rentbook_core::RoomUpdate;

use crate::cli::args::{parse_amount, parse_room, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::money;
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};

use super::CommandDefinition;

const ADD_USAGE: &str = "room-add <number> <rent> [water]";
const UPDATE_USAGE: &str = "room-update <number> [--rent <amount>] [--water <amount>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("room-add", "Add a room with its monthly prices", ADD_USAGE, cmd_add),
        CommandDefinition::new("room-list", "List rooms and occupants", "room-list", cmd_list),
        CommandDefinition::new("room-update", "Change a room's prices", UPDATE_USAGE, cmd_update),
        CommandDefinition::new(
            "room-remove",
            "Remove a vacant room without payments",
            "room-remove <number>",
            cmd_remove,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(3, ADD_USAGE)?;
    let number = parse_room(parsed.required(0, "room number")?)?;
    let rent = parse_amount(parsed.required(1, "rent")?, "rent")?;
    let water = parsed
        .optional(2)
        .map(|raw| parse_amount(raw, "water price"))
        .transpose()?
        .unwrap_or(Decimal::ZERO);

    context.app.add_room(number, rent, water)?;
    output::success(format!(
        "Room {number} added (rent {}, water {}).",
        money(context.currency(), rent),
        money(context.currency(), water)
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let currency = context.currency().to_string();
    let book = context.app.book();
    let rooms = context.app.rooms();
    if rooms.is_empty() {
        output::info("No rooms yet. Add one with `room-add`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Room"),
        TableColumn::right("Rent"),
        TableColumn::right("Water"),
        TableColumn::left("Occupant"),
    ]);
    for room in rooms {
        let occupant = book
            .occupant_of(room.id)
            .map(|person| person.name.clone())
            .unwrap_or_else(|| "(vacant)".into());
        table.push(vec![
            room.readable_id.to_string(),
            money(&currency, room.rent),
            money(&currency, room.water_price),
            occupant,
        ]);
    }
    output::plain(table.render());
    Ok(())
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(1, UPDATE_USAGE)?;
    let number = parse_room(parsed.required(0, "room number")?)?;
    let changes = RoomUpdate {
        rent: parsed
            .option("rent")
            .map(|raw| parse_amount(raw, "rent"))
            .transpose()?,
        water_price: parsed
            .option("water")
            .map(|raw| parse_amount(raw, "water price"))
            .transpose()?,
        is_occupied: None,
    };
    if changes.is_empty() {
        return Err(CommandError::InvalidArguments(
            "pass --rent and/or --water".into(),
        ));
    }

    context.app.update_room(number, changes)?;
    output::success(format!("Room {number} updated."));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let number = parse_room(
        args.first()
            .ok_or_else(|| CommandError::InvalidArguments("missing room number".into()))?,
    )?;
    context.app.remove_room(number)?;
    output::success(format!("Room {number} removed."));
    Ok(())
}
