//! Per-period charge breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{ensure_non_negative, round2, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChargeParts", into = "ChargeParts")]
/// Electricity, water, and rent owed for one billing period.
///
/// Always holds `total_charge == round2(electricity_cost + water_cost + rent_cost)`
/// with every component non-negative.
pub struct ChargeBreakdown {
    electricity_units: Decimal,
    electricity_cost: Decimal,
    water_cost: Decimal,
    rent_cost: Decimal,
    total_charge: Decimal,
}

impl ChargeBreakdown {
    /// Builds a breakdown from its components, deriving the rounded total.
    pub fn new(
        electricity_units: Decimal,
        electricity_cost: Decimal,
        water_cost: Decimal,
        rent_cost: Decimal,
    ) -> Result<Self, DomainError> {
        let electricity_units = ensure_non_negative("electricity units", electricity_units)?;
        let electricity_cost =
            round2(ensure_non_negative("electricity cost", electricity_cost)?);
        let water_cost = round2(ensure_non_negative("water cost", water_cost)?);
        let rent_cost = round2(ensure_non_negative("rent cost", rent_cost)?);
        Ok(Self {
            electricity_units,
            electricity_cost,
            water_cost,
            rent_cost,
            total_charge: round2(electricity_cost + water_cost + rent_cost),
        })
    }

    /// A charge of nothing at all, used for standalone balance settlements.
    pub fn zero() -> Self {
        Self {
            electricity_units: Decimal::ZERO,
            electricity_cost: Decimal::ZERO,
            water_cost: Decimal::ZERO,
            rent_cost: Decimal::ZERO,
            total_charge: Decimal::ZERO,
        }
    }

    pub fn electricity_units(&self) -> Decimal {
        self.electricity_units
    }

    pub fn electricity_cost(&self) -> Decimal {
        self.electricity_cost
    }

    pub fn water_cost(&self) -> Decimal {
        self.water_cost
    }

    pub fn rent_cost(&self) -> Decimal {
        self.rent_cost
    }

    pub fn total_charge(&self) -> Decimal {
        self.total_charge
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChargeParts {
    electricity_units: Decimal,
    electricity_cost: Decimal,
    water_cost: Decimal,
    rent_cost: Decimal,
    total_charge: Decimal,
}

impl TryFrom<ChargeParts> for ChargeBreakdown {
    type Error = DomainError;

    fn try_from(parts: ChargeParts) -> Result<Self, Self::Error> {
        let breakdown = ChargeBreakdown::new(
            parts.electricity_units,
            parts.electricity_cost,
            parts.water_cost,
            parts.rent_cost,
        )?;
        if breakdown.total_charge != round2(parts.total_charge) {
            return Err(DomainError::Inconsistent(format!(
                "stored total {} does not match components ({})",
                parts.total_charge, breakdown.total_charge
            )));
        }
        Ok(breakdown)
    }
}

impl From<ChargeBreakdown> for ChargeParts {
    fn from(charge: ChargeBreakdown) -> Self {
        Self {
            electricity_units: charge.electricity_units,
            electricity_cost: charge.electricity_cost,
            water_cost: charge.water_cost,
            rent_cost: charge.rent_cost,
            total_charge: charge.total_charge,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn total_is_rounded_sum_of_components() {
        let charge = ChargeBreakdown::new(dec!(40), dec!(520), dec!(500), dec!(12000)).unwrap();
        assert_eq!(charge.total_charge(), dec!(13020));
    }

    #[test]
    fn negative_components_are_rejected() {
        let err = ChargeBreakdown::new(dec!(1), dec!(13), dec!(-1), dec!(0)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NegativeAmount {
                field: "water cost",
                ..
            }
        ));
    }

    #[test]
    fn deserializing_a_tampered_total_fails() {
        let json = r#"{"electricity_units":"1","electricity_cost":"13","water_cost":"0","rent_cost":"0","total_charge":"99"}"#;
        assert!(serde_json::from_str::<ChargeBreakdown>(json).is_err());
    }
}
