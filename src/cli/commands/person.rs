use rentbook_core::{NewPerson, PersonUpdate};
use rentbook_domain::{BillingPeriod, BsDate};

use crate::app::RentbookApp;
use crate::cli::args::{parse_date, parse_number, parse_room, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};

use super::CommandDefinition;

const ADD_USAGE: &str = "person-add \"<name>\" <household size> <phone> [--room <number>] [--on <YYYY-MM-DD>] [--email <address>] [--deadline <day>]";
const UPDATE_USAGE: &str = "person-update \"<name>\" [--name <new name>] [--count <n>] [--phone <phone>] [--email <address>] [--deadline <day>]";
const ASSIGN_USAGE: &str = "person-assign \"<name>\" <room> [YYYY-MM-DD]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("person-add", "Register a tenant household", ADD_USAGE, cmd_add),
        CommandDefinition::new("person-list", "List tenants and their rooms", "person-list", cmd_list),
        CommandDefinition::new("person-update", "Edit a tenant's details", UPDATE_USAGE, cmd_update),
        CommandDefinition::new("person-assign", "Move a tenant into a room", ASSIGN_USAGE, cmd_assign),
        CommandDefinition::new(
            "person-unassign",
            "Move a tenant out of their room",
            "person-unassign \"<name>\"",
            cmd_unassign,
        ),
        CommandDefinition::new(
            "person-remove",
            "Remove a tenant without payments",
            "person-remove \"<name>\"",
            cmd_remove,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(3, ADD_USAGE)?;
    let name = parsed.required(0, "name")?;
    let household: u32 = parse_number(parsed.required(1, "household size")?, "household size")?;
    let phone = parsed.required(2, "phone")?;

    let mut person = NewPerson::new(name, household, phone);
    person.email = parsed.option("email").map(str::to_string);
    person.deadline_day = parsed
        .option("deadline")
        .map(|raw| parse_number(raw, "deadline day"))
        .transpose()?;
    if let Some(raw) = parsed.option("room") {
        let room = parse_room(raw)?;
        let on = move_in_date(&context.app, parsed.option("on"))?;
        person = person.assigned_to(context.app.room_id(room)?, on);
    } else if parsed.option("on").is_some() {
        return Err(CommandError::InvalidArguments(
            "--on only applies together with --room".into(),
        ));
    }

    context.app.add_person(person)?;
    output::success(format!("{} added.", name.trim()));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.app.book();
    let people = context.app.people();
    if people.is_empty() {
        output::info("No tenants yet. Add one with `person-add`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Name"),
        TableColumn::right("People"),
        TableColumn::left("Phone"),
        TableColumn::left("Room"),
        TableColumn::left("Since"),
        TableColumn::right("Due by"),
    ]);
    for person in people {
        let room = person
            .room_id
            .and_then(|id| book.room(id))
            .map(|room| room.readable_id.to_string())
            .unwrap_or_else(|| "-".into());
        table.push(vec![
            person.name.clone(),
            person.number_of_people.to_string(),
            person.phone.clone(),
            room,
            person
                .assigned_on
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".into()),
            person
                .deadline_day
                .map(|day| day.to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(1, UPDATE_USAGE)?;
    let name = parsed.required(0, "name")?;
    let changes = PersonUpdate {
        name: parsed.option("name").map(str::to_string),
        number_of_people: parsed
            .option("count")
            .map(|raw| parse_number(raw, "household size"))
            .transpose()?,
        phone: parsed.option("phone").map(str::to_string),
        email: parsed.option("email").map(str::to_string),
        deadline_day: parsed
            .option("deadline")
            .map(|raw| parse_number(raw, "deadline day"))
            .transpose()?,
    };

    context.app.update_person(name, changes)?;
    output::success(format!("{} updated.", name.trim()));
    Ok(())
}

fn cmd_assign(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(3, ASSIGN_USAGE)?;
    let name = parsed.required(0, "name")?;
    let room = parse_room(parsed.required(1, "room number")?)?;
    let on = move_in_date(&context.app, parsed.optional(2))?;

    context.app.assign_person(name, room, on)?;
    output::success(format!("{} moved into room {room} on {on}.", name.trim()));
    Ok(())
}

fn cmd_unassign(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = single_name(args)?;
    context.app.unassign_person(name)?;
    output::success(format!("{} moved out.", name.trim()));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = single_name(args)?;
    context.app.remove_person(name)?;
    output::success(format!("{} removed.", name.trim()));
    Ok(())
}

fn single_name<'a>(args: &[&'a str]) -> Result<&'a str, CommandError> {
    match args {
        [name] => Ok(*name),
        [] => Err(CommandError::InvalidArguments("missing name".into())),
        _ => Err(CommandError::InvalidArguments(
            "quote names that contain spaces".into(),
        )),
    }
}

/// An explicit date, else the first day of the current period.
fn move_in_date(app: &RentbookApp, raw: Option<&str>) -> Result<BsDate, CommandError> {
    if let Some(raw) = raw {
        return parse_date(raw);
    }
    let period: BillingPeriod = app.as_of()?;
    BsDate::new(period.year(), period.month(), 1)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}
