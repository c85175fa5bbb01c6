//! Display helpers for money, periods, and identifiers.

use rust_decimal::Decimal;
use uuid::Uuid;

use rentbook_domain::round2;

/// `NPR 13,020.00`; negative balances keep their sign in front of the digits.
pub(crate) fn money(currency: &str, value: Decimal) -> String {
    format!("{currency} {}", amount(value))
}

pub(crate) fn amount(value: Decimal) -> String {
    let rounded = round2(value);
    let raw = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}.{frac_part}", group_digits(int_part, ','))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_are_grouped_with_two_decimals() {
        assert_eq!(amount(dec!(13020)), "13,020.00");
        assert_eq!(amount(dec!(-1025.5)), "-1,025.50");
        assert_eq!(amount(dec!(0.005)), "0.01");
        assert_eq!(money("NPR", dec!(1234567.891)), "NPR 1,234,567.89");
    }
}
