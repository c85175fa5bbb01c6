//! Shared traits, monetary helpers, and validation errors for rental primitives.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Number of decimal places kept for every monetary value.
pub const MONEY_SCALE: u32 = 2;

/// Exposes a stable identifier for entities stored in the property book.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Rounds a monetary value to two decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Tolerance used when comparing balances: one hundredth of a currency unit.
pub fn tolerance() -> Decimal {
    Decimal::new(1, MONEY_SCALE)
}

/// Returns `true` when two monetary values differ by no more than [`tolerance`].
pub fn within_tolerance(left: Decimal, right: Decimal) -> bool {
    (left - right).abs() <= tolerance()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised when constructing domain values from untrusted input.
pub enum DomainError {
    InvalidMonth(u32),
    InvalidDay(u32),
    Malformed(String),
    NegativeAmount { field: &'static str, value: Decimal },
    Inconsistent(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidMonth(month) => {
                write!(f, "month {month} is outside 1..=12")
            }
            DomainError::InvalidDay(day) => write!(f, "day {day} is outside 1..=32"),
            DomainError::Malformed(raw) => write!(f, "malformed value `{raw}`"),
            DomainError::NegativeAmount { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            DomainError::Inconsistent(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for DomainError {}

/// Rejects negative monetary inputs with a field-tagged error.
pub fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<Decimal, DomainError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(DomainError::NegativeAmount { field, value })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round2(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(ensure_non_negative("rent", dec!(-0.01)).is_err());
        assert_eq!(ensure_non_negative("rent", dec!(0)).unwrap(), dec!(0));
    }
}
