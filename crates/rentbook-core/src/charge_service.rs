//! Turns meter readings and room prices into a per-period charge.

use rust_decimal::Decimal;
use tracing::warn;

use rentbook_domain::{ensure_non_negative, round2, within_tolerance, ChargeBreakdown};

use crate::CoreError;

/// Price of one electricity unit unless configuration says otherwise.
pub const DEFAULT_UNIT_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 0);

pub struct ChargeCalculator;

impl ChargeCalculator {
    /// Computes the charge for one billing period.
    ///
    /// When `rent_already_billed` is set the entry completes an earlier partial payment for
    /// the same period, so rent is not charged a second time.
    pub fn compute(
        units: Decimal,
        unit_rate: Decimal,
        water_cost: Decimal,
        rent_cost: Decimal,
        rent_already_billed: bool,
    ) -> Result<ChargeBreakdown, CoreError> {
        Self::ensure_rate(unit_rate)?;
        let units = ensure_non_negative("electricity units", units)?;
        let water_cost = ensure_non_negative("water cost", water_cost)?;
        let rent_cost = ensure_non_negative("rent cost", rent_cost)?;

        let electricity_cost = round2(units * unit_rate);
        let effective_rent = if rent_already_billed {
            Decimal::ZERO
        } else {
            rent_cost
        };
        Ok(ChargeBreakdown::new(
            units,
            electricity_cost,
            water_cost,
            effective_rent,
        )?)
    }

    /// Re-checks an externally supplied breakdown against the configured rate.
    pub fn verify(charge: &ChargeBreakdown, unit_rate: Decimal) -> Result<(), CoreError> {
        Self::ensure_rate(unit_rate)?;
        let expected = round2(charge.electricity_units() * unit_rate);
        if !within_tolerance(charge.electricity_cost(), expected) {
            warn!(
                expected = %expected,
                received = %charge.electricity_cost(),
                "electricity cost does not match unit rate"
            );
            return Err(CoreError::InvalidInput(format!(
                "electricity cost {} does not match {} units at {} (expected {})",
                charge.electricity_cost(),
                charge.electricity_units(),
                unit_rate,
                expected
            )));
        }
        Ok(())
    }

    fn ensure_rate(unit_rate: Decimal) -> Result<(), CoreError> {
        if unit_rate <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(format!(
                "unit rate must be positive (got {unit_rate})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn computes_electricity_and_total() {
        let charge =
            ChargeCalculator::compute(dec!(40), DEFAULT_UNIT_RATE, dec!(500), dec!(12000), false)
                .unwrap();
        assert_eq!(charge.electricity_cost(), dec!(520));
        assert_eq!(charge.total_charge(), dec!(13020));
    }

    #[test]
    fn skips_rent_when_completing_a_partial_period() {
        let charge =
            ChargeCalculator::compute(dec!(10), DEFAULT_UNIT_RATE, dec!(500), dec!(12000), true)
                .unwrap();
        assert_eq!(charge.rent_cost(), dec!(0));
        assert_eq!(charge.total_charge(), dec!(630));
    }

    #[test]
    fn electricity_cost_never_exceeds_two_decimals() {
        for (units, rate) in [
            (dec!(12.345), dec!(13)),
            (dec!(0.333), dec!(7.777)),
            (dec!(1.005), dec!(1)),
            (dec!(99999.999), dec!(0.01)),
        ] {
            let charge = ChargeCalculator::compute(units, rate, dec!(0), dec!(0), false).unwrap();
            assert!(charge.electricity_cost().scale() <= 2, "{units} x {rate}");
        }
    }

    #[test]
    fn rejects_non_positive_rates_and_negative_inputs() {
        assert!(matches!(
            ChargeCalculator::compute(dec!(1), dec!(0), dec!(0), dec!(0), false),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            ChargeCalculator::compute(dec!(-1), DEFAULT_UNIT_RATE, dec!(0), dec!(0), false),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            ChargeCalculator::compute(dec!(1), DEFAULT_UNIT_RATE, dec!(0), dec!(-5), false),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn verify_flags_mismatched_electricity_cost() {
        let good = ChargeBreakdown::new(dec!(40), dec!(520), dec!(0), dec!(0)).unwrap();
        assert!(ChargeCalculator::verify(&good, DEFAULT_UNIT_RATE).is_ok());
        let bad = ChargeBreakdown::new(dec!(40), dec!(500), dec!(0), dec!(0)).unwrap();
        assert!(ChargeCalculator::verify(&bad, DEFAULT_UNIT_RATE).is_err());
    }
}
