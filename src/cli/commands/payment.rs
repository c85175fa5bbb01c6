use rentbook_core::{PageRequest, PaymentFilter, PaymentRequest};
use rentbook_domain::{AdministrativeStatus, PaymentMethod, PaymentRecord, SettlementStatus};

use crate::cli::args::{parse_amount, parse_date, parse_number, parse_period, parse_room, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{money, short_id};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};

use super::CommandDefinition;

const PAY_USAGE: &str = "pay <room> <YYYY-MM|next> <electricity units> <amount> [--method cash|online] [--on <YYYY-MM-DD>] [--note <text>]";
const PREVIEW_USAGE: &str = "preview <room> <YYYY-MM|next> <electricity units> <amount>";
const LIST_USAGE: &str =
    "payments [--room <number>] [--period <YYYY-MM>] [--page <n>] [--limit <n>] [--all]";
const VOID_USAGE: &str = "void-payment <id> <failed|refunded>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("pay", "Record a rent payment for a room", PAY_USAGE, cmd_pay),
        CommandDefinition::new(
            "preview",
            "Show what a payment would record without saving it",
            PREVIEW_USAGE,
            cmd_preview,
        ),
        CommandDefinition::new("payments", "List recorded payments", LIST_USAGE, cmd_list),
        CommandDefinition::new(
            "void-payment",
            "Mark a payment failed or refunded",
            VOID_USAGE,
            cmd_void,
        ),
    ]
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(4, PAY_USAGE)?;
    let mut request = build_request(context, &parsed)?;
    if let Some(raw) = parsed.option("method") {
        request.method = raw
            .parse::<PaymentMethod>()
            .map_err(CommandError::InvalidArguments)?;
    }
    request.paid_on = parsed.option("on").map(parse_date).transpose()?;
    request.notes = parsed.option("note").map(str::to_string);

    let currency = context.currency().to_string();
    let payment = context.app.record_payment(request)?;
    output::success(format!(
        "Recorded {} for room {} ({}), {} [{}].",
        money(&currency, payment.record.amount_paid),
        payment.room_readable_id,
        payment.person_name,
        payment.period().label(),
        short_id(payment.id)
    ));
    print_record(&currency, &payment.record);
    Ok(())
}

fn cmd_preview(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(4, PREVIEW_USAGE)?;
    let request = build_request(context, &parsed)?;
    let preview = context.app.preview_payment(&request)?;

    output::section(format!("Preview {}", preview.record.period.label()));
    print_record(context.currency(), &preview.record);
    if preview.rent_already_billed {
        output::hint("Rent was already billed by an earlier partial payment this month.");
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["all"])?;
    parsed.ensure_at_most(0, LIST_USAGE)?;
    let filter = PaymentFilter {
        room_id: parsed
            .option("room")
            .map(|raw| -> Result<_, CommandError> { Ok(context.app.room_id(parse_room(raw)?)?) })
            .transpose()?,
        person_id: None,
        period: parsed.option("period").map(parse_period).transpose()?,
        include_voided: parsed.switch("all"),
    };
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

    let currency = context.currency();
    let payments = context.app.payments(&filter, page);
    if payments.items.is_empty() {
        output::info("No payments found.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Period"),
        TableColumn::left("Room"),
        TableColumn::left("Tenant"),
        TableColumn::right("Due"),
        TableColumn::right("Paid"),
        TableColumn::right("Remaining"),
        TableColumn::left("Status"),
    ]);
    for payment in &payments.items {
        table.push(vec![
            short_id(payment.id),
            payment.period().key(),
            payment.room_readable_id.to_string(),
            payment.person_name.clone(),
            money(currency, payment.record.total_due()),
            money(currency, payment.record.amount_paid),
            money(currency, payment.record.remaining_balance),
            payment.status_label(),
        ]);
    }
    output::plain(table.render());
    output::hint(format!(
        "page {} of {} ({} payments)",
        payments.page,
        payments.total_pages(),
        payments.total
    ));
    Ok(())
}

fn cmd_void(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.ensure_at_most(2, VOID_USAGE)?;
    let prefix = parsed.required(0, "payment id")?;
    let status = match parsed.required(1, "status")?.to_ascii_lowercase().as_str() {
        "failed" => AdministrativeStatus::Failed,
        "refunded" => AdministrativeStatus::Refunded,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown status `{other}` (use failed or refunded)"
            )))
        }
    };

    let id = context.app.void_payment(prefix, status)?;
    output::success(format!("Payment {} marked {status}.", short_id(id)));
    output::hint("Later entries keep their recorded balances; re-record the month if needed.");
    Ok(())
}

/// Reads `<room> <period|next> <units> <amount>` into a request.
fn build_request(
    context: &ShellContext,
    parsed: &ParsedArgs<'_>,
) -> Result<PaymentRequest, CommandError> {
    let room = parse_room(parsed.required(0, "room number")?)?;
    let raw_period = parsed.required(1, "period")?;
    let period = if raw_period.eq_ignore_ascii_case("next") {
        context.app.suggest_period(room)?
    } else {
        parse_period(raw_period)?
    };
    let units = parse_amount(parsed.required(2, "electricity units")?, "electricity units")?;
    let amount = parse_amount(parsed.required(3, "amount")?, "amount")?;
    Ok(PaymentRequest::new(
        context.app.room_id(room)?,
        period,
        units,
        amount,
    ))
}

fn print_record(currency: &str, record: &PaymentRecord) {
    let charge = &record.charge;
    output::info(format!(
        "  Electricity : {} ({} units)",
        money(currency, charge.electricity_cost()),
        charge.electricity_units()
    ));
    output::info(format!("  Water       : {}", money(currency, charge.water_cost())));
    output::info(format!("  Rent        : {}", money(currency, charge.rent_cost())));
    output::info(format!("  Carried in  : {}", money(currency, record.previous_balance)));
    output::info(format!("  Total due   : {}", money(currency, record.total_due())));
    output::info(format!("  Paid        : {}", money(currency, record.amount_paid)));
    output::info(format!("  Remaining   : {}", money(currency, record.remaining_balance)));
    let status = match record.status {
        SettlementStatus::Overpaid => format!("{} (credit carries forward)", record.status),
        SettlementStatus::Partial => format!("{} (balance carries forward)", record.status),
        _ => record.status.to_string(),
    };
    output::info(format!("  Status      : {status}"));
}
