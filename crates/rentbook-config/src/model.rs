use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rentbook_domain::BillingPeriod;

use crate::ConfigError;

/// User-facing settings, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Price of one electricity unit.
    #[serde(default = "Config::default_unit_rate")]
    pub unit_rate: Decimal,
    /// Pinned "current" billing period; when unset the latest recorded period is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<BillingPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
    #[serde(default = "Config::default_book_name")]
    pub book_name: String,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "ne-NP".into(),
            currency: "NPR".into(),
            unit_rate: Self::default_unit_rate(),
            current_period: None,
            data_root: None,
            book_name: Self::default_book_name(),
            backup_retention: Self::default_backup_retention(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 8] = [
        "locale",
        "currency",
        "unit_rate",
        "current_period",
        "data_root",
        "book_name",
        "backup_retention",
        "ui_color_enabled",
    ];

    pub fn default_unit_rate() -> Decimal {
        Decimal::from(13)
    }

    pub fn default_book_name() -> String {
        "property".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Data directory: the configured override, else `<base>/data`.
    pub fn resolve_data_root(&self, base: &std::path::Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| base.join("data"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_rate <= Decimal::ZERO {
            return Err(invalid("unit_rate", "must be greater than zero"));
        }
        if self.backup_retention == 0 {
            return Err(invalid("backup_retention", "must be at least 1"));
        }
        if self.book_name.trim().is_empty() {
            return Err(invalid("book_name", "must not be empty"));
        }
        Ok(())
    }

    /// Current value of a setting rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "unit_rate" => self.unit_rate.to_string(),
            "current_period" => self
                .current_period
                .map(|period| period.to_string())
                .unwrap_or_else(|| "(latest recorded)".into()),
            "data_root" => self
                .data_root
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "book_name" => self.book_name.clone(),
            "backup_retention" => self.backup_retention.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses and applies one setting. `none` clears optional settings.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let value = raw.trim();
        let clears = value.eq_ignore_ascii_case("none") || value.is_empty();
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_ascii_uppercase(),
            "unit_rate" => {
                let rate: Decimal = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a decimal number"))?;
                if rate <= Decimal::ZERO {
                    return Err(invalid(key, "must be greater than zero"));
                }
                self.unit_rate = rate;
            }
            "current_period" if clears => self.current_period = None,
            "current_period" => {
                let period: BillingPeriod = value
                    .parse()
                    .map_err(|err| invalid(key, &format!("{err}")))?;
                self.current_period = Some(period);
            }
            "data_root" if clears => self.data_root = None,
            "data_root" => self.data_root = Some(PathBuf::from(value)),
            "book_name" => self.book_name = non_empty(key, value)?,
            "backup_retention" => {
                let count: usize = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a whole number"))?;
                if count == 0 {
                    return Err(invalid(key, "must be at least 1"));
                }
                self.backup_retention = count;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid(key, "expected on/off")),
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(invalid(key, "must not be empty"))
    } else {
        Ok(value.to_string())
    }
}
