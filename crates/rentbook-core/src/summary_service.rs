//! Rent income figures per Bikram Sambat month and year.

use rust_decimal::Decimal;
use serde::Serialize;

use rentbook_domain::{round2, BillingPeriod, Payment, PropertyBook};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyIncome {
    pub period: BillingPeriod,
    /// Rent charged by entries booked against the month.
    pub rent: Decimal,
    /// Cash actually received by those entries.
    pub collected: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    pub fn rent_income_for_month(book: &PropertyBook, period: BillingPeriod) -> Decimal {
        Self::sum_rent(Self::active(book).filter(|payment| payment.period() == period))
    }

    pub fn rent_income_for_year(book: &PropertyBook, year: i32) -> Decimal {
        Self::sum_rent(Self::active(book).filter(|payment| payment.period().year() == year))
    }

    /// Twelve entries, Baisakh through Chaitra.
    pub fn monthly_series(book: &PropertyBook, year: i32) -> Result<Vec<MonthlyIncome>, CoreError> {
        let first = BillingPeriod::new(year, 1)?;
        let last = BillingPeriod::new(year, 12)?;
        Ok(BillingPeriod::range_inclusive(first, last)
            .into_iter()
            .map(|period| {
                let entries = || Self::active(book).filter(move |payment| payment.period() == period);
                MonthlyIncome {
                    period,
                    rent: Self::sum_rent(entries()),
                    collected: round2(entries().map(|payment| payment.record.amount_paid).sum()),
                }
            })
            .collect())
    }

    /// Running totals of [`monthly_series`](Self::monthly_series).
    pub fn cumulative_series(
        book: &PropertyBook,
        year: i32,
    ) -> Result<Vec<MonthlyIncome>, CoreError> {
        let mut rent = Decimal::ZERO;
        let mut collected = Decimal::ZERO;
        Ok(Self::monthly_series(book, year)?
            .into_iter()
            .map(|month| {
                rent = round2(rent + month.rent);
                collected = round2(collected + month.collected);
                MonthlyIncome {
                    period: month.period,
                    rent,
                    collected,
                }
            })
            .collect())
    }

    fn active(book: &PropertyBook) -> impl Iterator<Item = &Payment> {
        book.payments.iter().filter(|payment| payment.is_active())
    }

    fn sum_rent<'a>(payments: impl Iterator<Item = &'a Payment>) -> Decimal {
        round2(payments.map(|payment| payment.record.charge.rent_cost()).sum())
    }
}
