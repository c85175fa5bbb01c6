use rentbook_core::{OverduePeriod, OverdueStatus, PageRequest};
use rentbook_domain::EntityKind;

use crate::cli::args::{parse_number, parse_period, parse_room, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{money, short_id};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};

use super::CommandDefinition;

const LOGS_USAGE: &str = "logs [--entity room|person|payment] [--page <n>] [--limit <n>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "overdue",
            "Show unpaid months, per room or for every room",
            "overdue [room]",
            cmd_overdue,
        ),
        CommandDefinition::new(
            "income",
            "Show rent income per month for a year",
            "income [year] [--json]",
            cmd_income,
        ),
        CommandDefinition::new("logs", "Show the activity log", LOGS_USAGE, cmd_logs),
        CommandDefinition::new(
            "as-of",
            "Show or pin the current billing period",
            "as-of [YYYY-MM|clear]",
            cmd_as_of,
        ),
    ]
}

fn cmd_overdue(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(1, "overdue [room]")?;
    let as_of = context.app.as_of()?;

    if let Some(raw) = parsed.optional(0) {
        let room = parse_room(raw)?;
        let overdue = context.app.overdue(room)?;
        if overdue.is_empty() {
            output::success(format!("Room {room} is settled up to {}.", as_of.label()));
            return Ok(());
        }
        output::section(format!("Room {room} as of {}", as_of.label()));
        for entry in &overdue {
            output::info(format!("  {}", describe(context.currency(), entry)));
        }
        return Ok(());
    }

    let rooms = context.app.rooms_by_attention()?;
    if rooms.is_empty() {
        output::info("No occupied rooms.");
        return Ok(());
    }
    output::section(format!("Rooms as of {}", as_of.label()));
    let mut table = Table::new(vec![
        TableColumn::left("Room"),
        TableColumn::left("Tenant"),
        TableColumn::right("Months"),
        TableColumn::left("Details"),
    ]);
    for room in &rooms {
        let details = if room.is_overdue() {
            room.overdue
                .iter()
                .map(|entry| describe(context.currency(), entry))
                .collect::<Vec<_>>()
                .join("; ")
        } else {
            "settled".to_string()
        };
        table.push(vec![
            room.readable_id.to_string(),
            room.occupant.clone().unwrap_or_else(|| "-".into()),
            room.overdue.len().to_string(),
            details,
        ]);
    }
    output::plain(table.render());
    Ok(())
}

fn describe(currency: &str, entry: &OverduePeriod) -> String {
    match (entry.status, entry.remaining_amount) {
        (OverdueStatus::Partial, Some(remaining)) => format!(
            "{} partial, {} outstanding",
            entry.period.label(),
            money(currency, remaining)
        ),
        (status, _) => format!("{} {status}", entry.period.label()),
    }
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["json"])?;
    parsed.ensure_at_most(1, "income [year] [--json]")?;
    let year: i32 = match parsed.optional(0) {
        Some(raw) => parse_number(raw, "year")?,
        None => context.app.as_of()?.year(),
    };
    let (monthly, cumulative) = context.app.income(year)?;
    if parsed.switch("json") {
        let body = serde_json::json!({ "year": year, "monthly": monthly, "cumulative": cumulative });
        let rendered = serde_json::to_string_pretty(&body)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        output::plain(rendered);
        return Ok(());
    }

    output::section(format!("Rent income {year}"));
    let currency = context.currency();
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Rent"),
        TableColumn::right("Collected"),
        TableColumn::right("Rent to date"),
        TableColumn::right("Collected to date"),
    ]);
    for (month, running) in monthly.iter().zip(&cumulative) {
        table.push(vec![
            month.period.month_name().to_string(),
            money(currency, month.rent),
            money(currency, month.collected),
            money(currency, running.rent),
            money(currency, running.collected),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

fn cmd_logs(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(0, LOGS_USAGE)?;
    let entity = parsed
        .option("entity")
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "room" => Ok(EntityKind::Room),
            "person" => Ok(EntityKind::Person),
            "payment" => Ok(EntityKind::Payment),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown entity `{other}`"
            ))),
        })
        .transpose()?;
    let page = PageRequest::new(
        parsed
            .option("page")
            .map(|raw| parse_number(raw, "page"))
            .transpose()?
            .unwrap_or(1),
        parsed
            .option("limit")
            .map(|raw| parse_number(raw, "limit"))
            .transpose()?
            .unwrap_or(20),
    );

    let logs = context.app.logs(entity, page);
    if logs.items.is_empty() {
        output::info("No activity recorded.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("When"),
        TableColumn::left("Kind"),
        TableColumn::left("Entity"),
        TableColumn::left("Message"),
    ]);
    for entry in &logs.items {
        table.push(vec![
            entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            entry.kind.to_string(),
            entry.entity_id.map(short_id).unwrap_or_else(|| "-".into()),
            entry.message.clone(),
        ]);
    }
    output::plain(table.render());
    output::hint(format!(
        "page {} of {} ({} entries)",
        logs.page,
        logs.total_pages(),
        logs.total
    ));
    Ok(())
}

fn cmd_as_of(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let period = context.app.as_of()?;
            let source = if context.app.config().current_period.is_some() {
                "pinned"
            } else {
                "latest recorded"
            };
            output::info(format!("Current period: {} ({source})", period.label()));
        }
        [raw] if raw.eq_ignore_ascii_case("clear") => {
            context.app.set_as_of(None)?;
            output::success("Current period follows the latest recorded payment.");
        }
        [raw] => {
            let period = parse_period(raw)?;
            context.app.set_as_of(Some(period))?;
            output::success(format!("Current period pinned to {}.", period.label()));
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: as-of [YYYY-MM|clear]".into(),
            ))
        }
    }
    Ok(())
}
