//! Recording rent payments against a room's current tenancy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use rentbook_domain::{
    ActivityKind, AdministrativeStatus, BillingPeriod, BsDate, ChargeBreakdown, Payment,
    PaymentMethod, PaymentRecord, PropertyBook, Tenancy,
};

use crate::{
    ActivityService, ChargeCalculator, CoreError, LedgerEngine, OverduePeriod, Page, PageRequest,
};

/// Everything needed to book one payment for a room's occupant.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub room_id: Uuid,
    pub period: BillingPeriod,
    pub electricity_units: Decimal,
    pub amount_paid: Decimal,
    pub method: PaymentMethod,
    pub paid_on: Option<BsDate>,
    pub notes: Option<String>,
}

impl PaymentRequest {
    pub fn new(
        room_id: Uuid,
        period: BillingPeriod,
        electricity_units: Decimal,
        amount_paid: Decimal,
    ) -> Self {
        Self {
            room_id,
            period,
            electricity_units,
            amount_paid,
            method: PaymentMethod::default(),
            paid_on: None,
            notes: None,
        }
    }
}

/// The entry a request would produce, computed without touching the book.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPreview {
    pub record: PaymentRecord,
    /// Rent was left out because an earlier partial entry for the period already charged it.
    pub rent_already_billed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub room_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
    pub period: Option<BillingPeriod>,
    pub include_voided: bool,
}

impl PaymentFilter {
    fn matches(&self, payment: &Payment) -> bool {
        self.room_id.map_or(true, |id| payment.room_id == id)
            && self.person_id.map_or(true, |id| payment.person_id == id)
            && self.period.map_or(true, |period| payment.period() == period)
            && (self.include_voided || payment.is_active())
    }
}

/// One room's standing as of a reference period.
#[derive(Debug, Clone)]
pub struct RoomAttention {
    pub room_id: Uuid,
    pub readable_id: u32,
    pub occupant: Option<String>,
    pub overdue: Vec<OverduePeriod>,
}

impl RoomAttention {
    pub fn is_overdue(&self) -> bool {
        !self.overdue.is_empty()
    }
}

pub struct PaymentService;

impl PaymentService {
    /// Builds the ledger view for whoever currently occupies `room_id`.
    ///
    /// The tenancy starts in the month of the occupant's assignment date, or in the first
    /// month of `as_of`'s year when no date was recorded. Failed and refunded payments are
    /// left out.
    pub fn tenancy_for(
        book: &PropertyBook,
        room_id: Uuid,
        as_of: BillingPeriod,
    ) -> Result<Tenancy, CoreError> {
        let room = book
            .room(room_id)
            .ok_or_else(|| CoreError::RoomNotFound(room_id.to_string()))?;
        let occupant = book.occupant_of(room_id).ok_or_else(|| {
            CoreError::InvalidOperation(format!("room {} has no occupant", room.readable_id))
        })?;
        let start_period = occupant
            .assigned_on
            .map(|date| date.period())
            .unwrap_or_else(|| as_of.first_of_year());
        let records = book
            .payments
            .iter()
            .filter(|payment| {
                payment.room_id == room_id && payment.person_id == occupant.id && payment.is_active()
            })
            .map(|payment| payment.record.clone())
            .collect();
        Ok(Tenancy::new(start_period, room.rent, room.water_price)?.with_records(records))
    }

    /// Computes what [`record`](Self::record) would store, without storing it.
    pub fn preview(
        book: &PropertyBook,
        request: &PaymentRequest,
        unit_rate: Decimal,
        as_of: BillingPeriod,
        recorded_at: DateTime<Utc>,
    ) -> Result<PaymentPreview, CoreError> {
        let tenancy = Self::tenancy_for(book, request.room_id, as_of)?;
        let (charge, rent_already_billed) = Self::charge_for(&tenancy, request, unit_rate)?;
        let record = LedgerEngine::preview(
            &tenancy,
            request.period,
            charge,
            request.amount_paid,
            recorded_at,
        )?;
        Ok(PaymentPreview {
            record,
            rent_already_billed,
        })
    }

    /// Posts a payment through the ledger engine and appends it to the book.
    pub fn record(
        book: &mut PropertyBook,
        request: PaymentRequest,
        unit_rate: Decimal,
        as_of: BillingPeriod,
        recorded_at: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        let mut tenancy = Self::tenancy_for(book, request.room_id, as_of)?;
        let (charge, rent_already_billed) = Self::charge_for(&tenancy, &request, unit_rate)?;
        let record = LedgerEngine::post_payment(
            &mut tenancy,
            request.period,
            charge,
            request.amount_paid,
            recorded_at,
        )?;

        let (room_readable_id, person_id, person_name) = {
            let room = book
                .room(request.room_id)
                .ok_or_else(|| CoreError::RoomNotFound(request.room_id.to_string()))?;
            let occupant = book.occupant_of(request.room_id).ok_or_else(|| {
                CoreError::InvalidOperation(format!("room {} has no occupant", room.readable_id))
            })?;
            (room.readable_id, occupant.id, occupant.name.clone())
        };

        let payment = Payment {
            id: Uuid::new_v4(),
            room_id: request.room_id,
            person_id,
            room_readable_id,
            person_name: person_name.clone(),
            record,
            method: request.method,
            paid_on: request.paid_on,
            notes: request.notes.filter(|notes| !notes.trim().is_empty()),
            administrative: None,
        };
        let id = payment.id;
        let meta = json!({
            "period": payment.record.period,
            "amount_paid": payment.record.amount_paid,
            "remaining_balance": payment.record.remaining_balance,
            "status": payment.record.status,
            "rent_already_billed": rent_already_billed,
        });
        let message = format!(
            "Payment for room {} ({}) {}",
            room_readable_id,
            person_name,
            payment.record.period.label()
        );
        info!(
            room = room_readable_id,
            period = %payment.record.period,
            status = %payment.record.status,
            remaining = %payment.record.remaining_balance,
            "payment recorded"
        );
        book.payments.push(payment);
        ActivityService::record(book, ActivityKind::PaymentCreated, Some(id), message, Some(meta));
        Ok(id)
    }

    /// Marks a payment failed or refunded, which removes it from the ledger view.
    pub fn mark_administrative(
        book: &mut PropertyBook,
        id: Uuid,
        status: AdministrativeStatus,
    ) -> Result<(), CoreError> {
        let payment = book.payment_mut(id).ok_or(CoreError::PaymentNotFound(id))?;
        if let Some(existing) = payment.administrative {
            return Err(CoreError::InvalidOperation(format!(
                "payment is already {existing}"
            )));
        }
        payment.administrative = Some(status);
        let message = format!(
            "Payment for room {} {} marked {status}",
            payment.room_readable_id,
            payment.period().label()
        );
        warn!(payment = %id, %status, "payment removed from ledger");
        ActivityService::record(
            book,
            ActivityKind::PaymentUpdated,
            Some(id),
            message,
            Some(json!({ "administrative": status })),
        );
        Ok(())
    }

    /// Payments newest first by recorded time.
    pub fn list<'a>(
        book: &'a PropertyBook,
        filter: &PaymentFilter,
        request: PageRequest,
    ) -> Page<&'a Payment> {
        let mut payments: Vec<&Payment> = book
            .payments
            .iter()
            .rev()
            .filter(|payment| filter.matches(payment))
            .collect();
        payments.sort_by(|a, b| b.record.recorded_at.cmp(&a.record.recorded_at));
        Page::from_ordered(payments, request)
    }

    pub fn overdue(
        book: &PropertyBook,
        room_id: Uuid,
        as_of: BillingPeriod,
    ) -> Result<Vec<OverduePeriod>, CoreError> {
        let tenancy = Self::tenancy_for(book, room_id, as_of)?;
        Ok(LedgerEngine::overdue_periods(&tenancy, as_of))
    }

    pub fn suggest_period(
        book: &PropertyBook,
        room_id: Uuid,
        as_of: BillingPeriod,
    ) -> Result<BillingPeriod, CoreError> {
        let tenancy = Self::tenancy_for(book, room_id, as_of)?;
        Ok(LedgerEngine::suggest_next_period(&tenancy, as_of))
    }

    /// Every room with its overdue periods; overdue rooms first, then by room number.
    pub fn rooms_by_attention(
        book: &PropertyBook,
        as_of: BillingPeriod,
    ) -> Result<Vec<RoomAttention>, CoreError> {
        let mut rooms = Vec::with_capacity(book.rooms.len());
        for room in &book.rooms {
            let occupant = book.occupant_of(room.id);
            let overdue = match occupant {
                Some(_) => Self::overdue(book, room.id, as_of)?,
                None => Vec::new(),
            };
            rooms.push(RoomAttention {
                room_id: room.id,
                readable_id: room.readable_id,
                occupant: occupant.map(|person| person.name.clone()),
                overdue,
            });
        }
        rooms.sort_by_key(|entry| (!entry.is_overdue(), entry.readable_id));
        Ok(rooms)
    }

    fn charge_for(
        tenancy: &Tenancy,
        request: &PaymentRequest,
        unit_rate: Decimal,
    ) -> Result<(ChargeBreakdown, bool), CoreError> {
        let rent_already_billed = LedgerEngine::has_partial_for(tenancy, request.period);
        let charge = ChargeCalculator::compute(
            request.electricity_units,
            unit_rate,
            tenancy.monthly_water(),
            tenancy.monthly_rent(),
            rent_already_billed,
        )?;
        Ok((charge, rent_already_billed))
    }
}
