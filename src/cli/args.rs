//! Argument helpers shared by command handlers.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use rentbook_domain::{normalize_digits, BillingPeriod, BsDate};

use crate::cli::core::CommandError;

/// Positional arguments plus `--name value` options and bare `--switch` flags.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    options: HashMap<&'a str, &'a str>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// `switches` names the flags that take no value.
    pub(crate) fn parse(args: &[&'a str], switches: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            match arg.strip_prefix("--") {
                Some(name) if switches.contains(&name) => parsed.switches.push(name),
                Some(name) => {
                    let value = iter.next().ok_or_else(|| {
                        CommandError::InvalidArguments(format!("option `--{name}` needs a value"))
                    })?;
                    parsed.options.insert(name, value);
                }
                None => parsed.positional.push(arg),
            }
        }
        Ok(parsed)
    }

    pub(crate) fn required(&self, index: usize, what: &str) -> Result<&'a str, CommandError> {
        self.positional
            .get(index)
            .copied()
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing {what}")))
    }

    pub(crate) fn optional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    pub(crate) fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub(crate) fn switch(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }

    pub(crate) fn ensure_at_most(&self, count: usize, usage: &str) -> Result<(), CommandError> {
        if self.positional.len() > count {
            Err(CommandError::InvalidArguments(format!("usage: {usage}")))
        } else {
            Ok(())
        }
    }
}

pub(crate) fn parse_room(input: &str) -> Result<u32, CommandError> {
    parse_number(input, "room number")
}

pub(crate) fn parse_number<T: FromStr>(input: &str, what: &str) -> Result<T, CommandError> {
    normalize_digits(input.trim())
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {what} `{input}`")))
}

/// Accepts Devanagari digits and thousands separators.
pub(crate) fn parse_amount(input: &str, what: &str) -> Result<Decimal, CommandError> {
    let cleaned = normalize_digits(input.trim()).replace(',', "");
    let value: Decimal = cleaned
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {what} `{input}`")))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CommandError::InvalidArguments(format!(
            "{what} must not be negative"
        )));
    }
    Ok(value)
}

pub(crate) fn parse_period(input: &str) -> Result<BillingPeriod, CommandError> {
    input.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid period `{input}` (use YYYY-MM)"))
    })
}

pub(crate) fn parse_date(input: &str) -> Result<BsDate, CommandError> {
    input.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn options_and_switches_are_separated() {
        let parsed =
            ParsedArgs::parse(&["101", "--method", "online", "--all", "2081-02"], &["all"])
                .expect("parse");
        assert_eq!(parsed.required(0, "room").unwrap(), "101");
        assert_eq!(parsed.optional(1), Some("2081-02"));
        assert_eq!(parsed.option("method"), Some("online"));
        assert!(parsed.switch("all"));
        assert!(parsed.required(2, "amount").is_err());
    }

    #[test]
    fn dangling_option_is_rejected() {
        assert!(ParsedArgs::parse(&["--note"], &[]).is_err());
    }

    #[test]
    fn amounts_accept_nepali_digits_and_grouping() {
        assert_eq!(parse_amount("१३,०२०", "amount").unwrap(), dec!(13020));
        assert_eq!(parse_amount("12.5", "amount").unwrap(), dec!(12.5));
        assert!(parse_amount("-1", "amount").is_err());
        assert_eq!(parse_room("२०१").unwrap(), 201);
    }
}
