//! Ledger entries and the persisted payment envelope around them.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    calendar::{BillingPeriod, BsDate},
    charge::ChargeBreakdown,
    common::{round2, Displayable, Identifiable},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Settlement classification derived from what was due and what was paid.
pub enum SettlementStatus {
    Pending,
    Completed,
    Partial,
    Overpaid,
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Completed => "completed",
            SettlementStatus::Partial => "partial",
            SettlementStatus::Overpaid => "overpaid",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One ledger entry for a tenancy and billing period.
///
/// Fields stay public so stored history can be loaded as-is and audited by the
/// ledger engine before it is trusted for balance carry-forward.
pub struct PaymentRecord {
    pub period: BillingPeriod,
    pub charge: ChargeBreakdown,
    pub previous_balance: Decimal,
    pub amount_paid: Decimal,
    pub remaining_balance: Decimal,
    pub status: SettlementStatus,
    pub recorded_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Period charge plus whatever was carried in from earlier entries.
    pub fn total_due(&self) -> Decimal {
        round2(self.charge.total_charge() + self.previous_balance)
    }

    /// The remaining balance implied by the record's own charge, carry, and payment.
    pub fn expected_remaining(&self) -> Decimal {
        round2(self.total_due() - self.amount_paid)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Online,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("cash"),
            PaymentMethod::Online => f.write_str("online"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "online" => Ok(PaymentMethod::Online),
            other => Err(format!("unknown payment method `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Terminal states set by an administrator after the fact.
pub enum AdministrativeStatus {
    Failed,
    Refunded,
}

impl fmt::Display for AdministrativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdministrativeStatus::Failed => f.write_str("failed"),
            AdministrativeStatus::Refunded => f.write_str("refunded"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A stored payment: the ledger record plus who paid, for which room, and how.
pub struct Payment {
    pub id: Uuid,
    pub room_id: Uuid,
    pub person_id: Uuid,
    pub room_readable_id: u32,
    pub person_name: String,
    pub record: PaymentRecord,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<BsDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative: Option<AdministrativeStatus>,
}

impl Payment {
    pub fn period(&self) -> BillingPeriod {
        self.record.period
    }

    /// Failed and refunded payments no longer take part in the ledger.
    pub fn is_active(&self) -> bool {
        self.administrative.is_none()
    }

    pub fn status_label(&self) -> String {
        match self.administrative {
            Some(admin) => admin.to_string(),
            None => self.record.status.to_string(),
        }
    }
}

impl Identifiable for Payment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Payment {
    fn display_label(&self) -> String {
        format!(
            "Room {} - {} - {} ({})",
            self.room_readable_id,
            self.person_name,
            self.record.period.label(),
            self.status_label()
        )
    }
}
