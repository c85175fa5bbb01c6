//! Balance carry-forward, settlement classification, and overdue detection.
//!
//! Everything here is a pure function of the tenancy handed in plus an explicit
//! `as_of` period; nothing reads the clock or touches storage.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use rentbook_domain::{
    ensure_non_negative, round2, tolerance, BillingPeriod, ChargeBreakdown, PaymentRecord,
    SettlementStatus, Tenancy,
};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverdueStatus {
    Missing,
    Partial,
}

impl fmt::Display for OverdueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverdueStatus::Missing => f.write_str("missing"),
            OverdueStatus::Partial => f.write_str("partial"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A billing period that still needs attention as of some reference month.
pub struct OverduePeriod {
    pub period: BillingPeriod,
    pub status: OverdueStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_amount: Option<Decimal>,
}

pub struct LedgerEngine;

impl LedgerEngine {
    /// Classifies a settlement from what was due and what was paid.
    pub fn classify(total_due: Decimal, amount_paid: Decimal) -> SettlementStatus {
        if amount_paid.is_zero() {
            return SettlementStatus::Pending;
        }
        let remaining = round2(total_due - amount_paid);
        if remaining > tolerance() {
            SettlementStatus::Partial
        } else if remaining < -tolerance() {
            SettlementStatus::Overpaid
        } else {
            SettlementStatus::Completed
        }
    }

    /// Builds and appends the ledger entry for `period`, returning a copy of it.
    ///
    /// Earlier records are never modified.
    pub fn post_payment(
        tenancy: &mut Tenancy,
        period: BillingPeriod,
        charge: ChargeBreakdown,
        amount_paid: Decimal,
        recorded_at: DateTime<Utc>,
    ) -> Result<PaymentRecord, CoreError> {
        let record = Self::preview(tenancy, period, charge, amount_paid, recorded_at)?;
        tenancy.push_record(record.clone());
        Ok(record)
    }

    /// Computes the entry [`post_payment`](Self::post_payment) would append, without appending it.
    pub fn preview(
        tenancy: &Tenancy,
        period: BillingPeriod,
        charge: ChargeBreakdown,
        amount_paid: Decimal,
        recorded_at: DateTime<Utc>,
    ) -> Result<PaymentRecord, CoreError> {
        let amount_paid = match ensure_non_negative("amount paid", amount_paid) {
            Ok(value) => round2(value),
            Err(err) => {
                warn!(%period, %amount_paid, "rejected negative payment");
                return Err(err.into());
            }
        };
        let previous_balance = Self::carried_balance(tenancy, period)?;
        let total_due = round2(charge.total_charge() + previous_balance);
        let remaining_balance = round2(total_due - amount_paid);
        let status = Self::classify(total_due, amount_paid);
        debug!(
            %period,
            %previous_balance,
            %total_due,
            %amount_paid,
            %remaining_balance,
            %status,
            "computed ledger entry"
        );
        Ok(PaymentRecord {
            period,
            charge,
            previous_balance,
            amount_paid,
            remaining_balance,
            status,
            recorded_at,
        })
    }

    /// Balance brought forward into a new entry for `period`.
    ///
    /// The source is the most recently recorded entry among periods strictly before
    /// `period`; entries already booked against `period` itself never feed the carry.
    /// No source means zero.
    pub fn carried_balance(tenancy: &Tenancy, period: BillingPeriod) -> Result<Decimal, CoreError> {
        let source = Self::latest_by_recorded(
            tenancy
                .records()
                .iter()
                .filter(|record| record.period < period),
        );
        match source {
            Some(record) => {
                Self::verify_record(record)?;
                Ok(record.remaining_balance)
            }
            None => Ok(Decimal::ZERO),
        }
    }

    /// The record that wins for `period`: latest `recorded_at`, then last inserted.
    pub fn latest_record_for(tenancy: &Tenancy, period: BillingPeriod) -> Option<&PaymentRecord> {
        Self::latest_by_recorded(tenancy.records_for(period))
    }

    /// Whether rent for `period` was already charged by an earlier partial payment.
    pub fn has_partial_for(tenancy: &Tenancy, period: BillingPeriod) -> bool {
        tenancy
            .records_for(period)
            .any(|record| record.status == SettlementStatus::Partial)
    }

    /// Periods from the first checked month through `as_of` that are unpaid or only partly paid.
    ///
    /// Only the year of `as_of` is examined. The month the tenancy started is a grace
    /// period when it is also the reference month.
    pub fn overdue_periods(tenancy: &Tenancy, as_of: BillingPeriod) -> Vec<OverduePeriod> {
        let start_period = tenancy.start_period();
        if as_of <= start_period {
            return Vec::new();
        }
        let start_check = if start_period.year() == as_of.year() {
            start_period
        } else {
            as_of.first_of_year()
        };

        BillingPeriod::range_inclusive(start_check, as_of)
            .into_iter()
            .filter_map(|period| match Self::latest_record_for(tenancy, period) {
                None => Some(OverduePeriod {
                    period,
                    status: OverdueStatus::Missing,
                    remaining_amount: None,
                }),
                Some(record) if record.status == SettlementStatus::Partial => Some(OverduePeriod {
                    period,
                    status: OverdueStatus::Partial,
                    remaining_amount: Some(record.remaining_balance),
                }),
                Some(_) => None,
            })
            .collect()
    }

    pub fn is_overdue(tenancy: &Tenancy, as_of: BillingPeriod) -> bool {
        !Self::overdue_periods(tenancy, as_of).is_empty()
    }

    /// Period to bill next: the month after the latest completed one, else `as_of`.
    pub fn suggest_next_period(tenancy: &Tenancy, as_of: BillingPeriod) -> BillingPeriod {
        tenancy
            .records()
            .iter()
            .filter(|record| record.status == SettlementStatus::Completed)
            .map(|record| record.period)
            .max()
            .map(|period| period.next())
            .unwrap_or(as_of)
    }

    /// Rejects a stored record whose remaining balance contradicts its own figures.
    pub fn verify_record(record: &PaymentRecord) -> Result<(), CoreError> {
        let expected = record.expected_remaining();
        if record.remaining_balance != expected {
            warn!(
                period = %record.period,
                stored = %record.remaining_balance,
                %expected,
                "stored ledger entry does not reconcile"
            );
            return Err(CoreError::InconsistentHistory(format!(
                "entry for {} stores remaining balance {} but charge {} + carried {} - paid {} = {}",
                record.period,
                record.remaining_balance,
                record.charge.total_charge(),
                record.previous_balance,
                record.amount_paid,
                expected
            )));
        }
        Ok(())
    }

    fn latest_by_recorded<'a>(
        records: impl Iterator<Item = &'a PaymentRecord>,
    ) -> Option<&'a PaymentRecord> {
        records.fold(None, |best: Option<&PaymentRecord>, record| match best {
            Some(current) if record.recorded_at < current.recorded_at => Some(current),
            _ => Some(record),
        })
    }
}
