use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    calendar::BillingPeriod,
    common::{ensure_non_negative, DomainError},
    payment::PaymentRecord,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A computed view of one occupant's stay in one room, with its payment history.
///
/// Only [`Tenancy::new`] builds one, so the rates are never negative. `records` keeps
/// insertion order; that order breaks ties between records that share a period and a
/// `recorded_at` timestamp.
pub struct Tenancy {
    start_period: BillingPeriod,
    monthly_rent: Decimal,
    monthly_water: Decimal,
    records: Vec<PaymentRecord>,
}

impl Tenancy {
    pub fn new(
        start_period: BillingPeriod,
        monthly_rent: Decimal,
        monthly_water: Decimal,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            start_period,
            monthly_rent: ensure_non_negative("monthly rent", monthly_rent)?,
            monthly_water: ensure_non_negative("monthly water", monthly_water)?,
            records: Vec::new(),
        })
    }

    pub fn with_records(mut self, records: Vec<PaymentRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn start_period(&self) -> BillingPeriod {
        self.start_period
    }

    pub fn monthly_rent(&self) -> Decimal {
        self.monthly_rent
    }

    pub fn monthly_water(&self) -> Decimal {
        self.monthly_water
    }

    pub fn records(&self) -> &[PaymentRecord] {
        &self.records
    }

    /// Appends a ledger entry. Existing entries are never touched.
    pub fn push_record(&mut self, record: PaymentRecord) {
        self.records.push(record);
    }

    /// Records booked against `period`, in insertion order.
    pub fn records_for(&self, period: BillingPeriod) -> impl Iterator<Item = &PaymentRecord> {
        self.records
            .iter()
            .filter(move |record| record.period == period)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn period(month: u32) -> BillingPeriod {
        BillingPeriod::new(2081, month).unwrap()
    }

    #[test]
    fn negative_rates_are_rejected() {
        let err = Tenancy::new(period(1), dec!(-1), dec!(500)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NegativeAmount {
                field: "monthly rent",
                ..
            }
        ));
        assert!(Tenancy::new(period(1), dec!(12000), dec!(-0.5)).is_err());
    }

    #[test]
    fn accessors_expose_the_validated_terms() {
        let tenancy = Tenancy::new(period(3), dec!(12000), dec!(500)).unwrap();
        assert_eq!(tenancy.start_period(), period(3));
        assert_eq!(tenancy.monthly_rent(), dec!(12000));
        assert_eq!(tenancy.monthly_water(), dec!(500));
        assert!(tenancy.records().is_empty());
        assert_eq!(tenancy.records_for(period(3)).count(), 0);
    }
}
