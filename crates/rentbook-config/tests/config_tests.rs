use rentbook_config::{Config, ConfigError, ConfigManager};
use rentbook_domain::BillingPeriod;
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn default_config_targets_nepali_rupees() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, "NPR");
    assert_eq!(cfg.locale, "ne-NP");
    assert_eq!(cfg.unit_rate, dec!(13));
    assert_eq!(cfg.backup_retention, 5);
    assert!(cfg.current_period.is_none());
    cfg.validate().expect("defaults are valid");
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("defaults"), Config::default());

    let mut cfg = Config::default();
    cfg.set("unit_rate", "14.5").expect("rate");
    cfg.set("current_period", "२०८१-०७").expect("period");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.unit_rate, dec!(14.5));
    assert_eq!(
        loaded.current_period,
        Some(BillingPeriod::new(2081, 7).expect("period"))
    );
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn overwriting_config_keeps_a_backup() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    manager.save(&cfg).expect("first save");
    cfg.set("currency", "inr").expect("currency");
    manager.save(&cfg).expect("second save");

    let backups = manager.list_backups().expect("backups");
    assert_eq!(backups.len(), 1);
    let restored = manager.restore(&backups[0]).expect("restore");
    assert_eq!(restored.currency, "NPR");
    assert_eq!(manager.load().expect("load").currency, "INR");
}

#[test]
fn invalid_settings_are_rejected() {
    let mut cfg = Config::default();
    assert!(matches!(
        cfg.set("unit_rate", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set("current_period", "2081-13"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set("theme", "dark"),
        Err(ConfigError::UnknownKey(_))
    ));
    cfg.set("current_period", "none").expect("clear");
    assert_eq!(cfg.get("current_period").expect("get"), "(latest recorded)");
}
