//! Bikram Sambat month arithmetic.
//!
//! Billing happens at month granularity, so only `(year, month)` pairs are modelled here;
//! day-level calendar tables are not needed for ledger logic.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::DomainError;

/// Month names in calendar order, paired as (romanized, Devanagari).
pub const BS_MONTHS: [(&str, &str); 12] = [
    ("Baisakh", "बैशाख"),
    ("Jestha", "जेष्ठ"),
    ("Asar", "आषाढ"),
    ("Shrawan", "श्रावण"),
    ("Bhadra", "भाद्र"),
    ("Ashwin", "आश्विन"),
    ("Kartik", "कार्तिक"),
    ("Mangsir", "मंसिर"),
    ("Poush", "पौष"),
    ("Magh", "माघ"),
    ("Falgun", "फाल्गुन"),
    ("Chaitra", "चैत्र"),
];

const MONTHS_PER_YEAR: i32 = 12;
const MAX_BS_DAY: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// One Bikram Sambat month, the unit every charge and payment is booked against.
///
/// Field order makes the derived ordering chronological, which for four-digit years
/// is the same order as the zero-padded `"YYYY-MM"` key.
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Month 12 rolls over to month 1 of the following year.
    pub fn next(&self) -> Self {
        self.shift(1)
    }

    /// Month 1 rolls back to month 12 of the previous year.
    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    /// Moves the period by a signed number of months.
    pub fn shift(&self, months: i32) -> Self {
        Self::from_index(self.index() + months)
    }

    /// Canonical `"YYYY-MM"` key used for storage, ordering, and equality.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Chronological order; agrees with comparing the `"YYYY-MM"` keys.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Signed number of month steps needed to go from `self` to `other`.
    pub fn months_between(&self, other: &Self) -> i32 {
        other.index() - self.index()
    }

    /// Every period from `start` to `end`, both included. Empty when `end` precedes `start`.
    pub fn range_inclusive(start: Self, end: Self) -> Vec<Self> {
        let steps = start.months_between(&end);
        if steps < 0 {
            return Vec::new();
        }
        (0..=steps).map(|offset| start.shift(offset)).collect()
    }

    /// First month (Baisakh) of the period's year.
    pub fn first_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: 1,
        }
    }

    pub fn month_name(&self) -> &'static str {
        BS_MONTHS[self.month as usize - 1].0
    }

    pub fn month_name_nepali(&self) -> &'static str {
        BS_MONTHS[self.month as usize - 1].1
    }

    /// Human label such as `"Kartik 2081"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    fn index(&self) -> i32 {
        self.year * MONTHS_PER_YEAR + self.month as i32 - 1
    }

    fn from_index(index: i32) -> Self {
        Self {
            year: index.div_euclid(MONTHS_PER_YEAR),
            month: index.rem_euclid(MONTHS_PER_YEAR) as u32 + 1,
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for BillingPeriod {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_digits(value.trim());
        let parts: Vec<&str> = normalized.split('-').collect();
        match parts.as_slice() {
            [year, month] => {
                let year = parse_part(year, value)?;
                let month = parse_part(month, value)?;
                Self::new(year, month as u32)
            }
            _ => Err(DomainError::Malformed(value.to_string())),
        }
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BillingPeriod> for String {
    fn from(period: BillingPeriod) -> Self {
        period.key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// A day-precision Bikram Sambat date, e.g. a tenant's move-in day.
pub struct BsDate {
    year: i32,
    month: u32,
    day: u32,
}

impl BsDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DomainError> {
        BillingPeriod::new(year, month)?;
        if !(1..=MAX_BS_DAY).contains(&day) {
            return Err(DomainError::InvalidDay(day));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The billing period this date falls in.
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod {
            year: self.year,
            month: self.month,
        }
    }
}

impl fmt::Display for BsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for BsDate {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_digits(value.trim());
        let parts: Vec<&str> = normalized.split('-').collect();
        match parts.as_slice() {
            [year, month, day] => Self::new(
                parse_part(year, value)?,
                parse_part(month, value)? as u32,
                parse_part(day, value)? as u32,
            ),
            _ => Err(DomainError::Malformed(value.to_string())),
        }
    }
}

impl TryFrom<String> for BsDate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BsDate> for String {
    fn from(date: BsDate) -> Self {
        date.to_string()
    }
}

/// Replaces Devanagari digits (`०`..`९`) with their ASCII counterparts.
pub fn normalize_digits(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\u{0966}'..='\u{096F}' => {
                char::from(b'0' + (ch as u32 - '\u{0966}' as u32) as u8)
            }
            other => other,
        })
        .collect()
}

fn parse_part(part: &str, raw: &str) -> Result<i32, DomainError> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::Malformed(raw.to_string()));
    }
    part.parse::<i32>()
        .map_err(|_| DomainError::Malformed(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(year: i32, month: u32) -> BillingPeriod {
        BillingPeriod::new(year, month).unwrap()
    }

    #[test]
    fn next_and_previous_roll_over_year_boundaries() {
        assert_eq!(period(2081, 12).next(), period(2082, 1));
        assert_eq!(period(2081, 5).next(), period(2081, 6));
        assert_eq!(period(2082, 1).previous(), period(2081, 12));
        assert_eq!(period(2082, 7).previous(), period(2082, 6));
    }

    #[test]
    fn key_is_zero_padded() {
        assert_eq!(period(2081, 7).key(), "2081-07");
        assert_eq!(period(2081, 12).to_string(), "2081-12");
    }

    #[test]
    fn compare_follows_calendar_order() {
        assert_eq!(period(2081, 9).compare(&period(2081, 10)), Ordering::Less);
        assert_eq!(period(2082, 1).compare(&period(2081, 12)), Ordering::Greater);
        assert_eq!(period(2081, 3).compare(&period(2081, 3)), Ordering::Equal);
        assert!(period(2081, 9) < period(2081, 10));
    }

    #[test]
    fn compare_agrees_with_key_order() {
        let periods = [
            period(2080, 12),
            period(2081, 1),
            period(2081, 2),
            period(2081, 10),
            period(2081, 12),
            period(2082, 1),
        ];
        for left in &periods {
            for right in &periods {
                assert_eq!(left.compare(right), left.key().cmp(&right.key()));
                assert_eq!(left.compare(right), left.cmp(right));
            }
        }
    }

    #[test]
    fn months_between_is_signed() {
        assert_eq!(period(2081, 11).months_between(&period(2082, 2)), 3);
        assert_eq!(period(2082, 2).months_between(&period(2081, 11)), -3);
        assert_eq!(period(2081, 4).months_between(&period(2081, 4)), 0);
    }

    #[test]
    fn range_inclusive_spans_year_end() {
        let keys: Vec<String> = BillingPeriod::range_inclusive(period(2081, 11), period(2082, 2))
            .iter()
            .map(BillingPeriod::key)
            .collect();
        assert_eq!(keys, vec!["2081-11", "2081-12", "2082-01", "2082-02"]);
        assert!(BillingPeriod::range_inclusive(period(2082, 2), period(2081, 11)).is_empty());
    }

    #[test]
    fn invalid_months_are_rejected() {
        assert_eq!(BillingPeriod::new(2081, 0), Err(DomainError::InvalidMonth(0)));
        assert_eq!(BillingPeriod::new(2081, 13), Err(DomainError::InvalidMonth(13)));
        assert!("2081-13".parse::<BillingPeriod>().is_err());
        assert!("2081/01".parse::<BillingPeriod>().is_err());
    }

    #[test]
    fn parses_devanagari_digits() {
        let parsed: BillingPeriod = "२०८१-०७".parse().unwrap();
        assert_eq!(parsed, period(2081, 7));
        let date: BsDate = "२०८२-०६-१६".parse().unwrap();
        assert_eq!(date.to_string(), "2082-06-16");
        assert_eq!(date.period(), period(2082, 6));
    }

    #[test]
    fn labels_use_month_names() {
        assert_eq!(period(2081, 7).label(), "Kartik 2081");
        assert_eq!(period(2081, 1).month_name_nepali(), "बैशाख");
    }

    #[test]
    fn serializes_as_key() {
        let json = serde_json::to_string(&period(2081, 2)).unwrap();
        assert_eq!(json, "\"2081-02\"");
        let back: BillingPeriod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period(2081, 2));
        assert!(serde_json::from_str::<BillingPeriod>("\"2081-00\"").is_err());
    }
}
