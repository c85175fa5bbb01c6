#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rentbook::RentbookApp;
use rentbook_config::ConfigManager;
use rentbook_core::Clock;
use rentbook_storage_json::{JsonBookStorage, StoragePaths};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Advances one second per reading so every ledger entry gets a distinct timestamp.
pub struct TickClock {
    next: AtomicI64,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(1_700_000_000),
        }
    }
}

impl Clock for TickClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.next.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }
}

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens an app over a fresh base directory with a deterministic clock.
pub fn setup_app() -> (RentbookApp, PathBuf) {
    let base = temp_base();
    (open_app(&base), base)
}

pub fn open_app(base: &Path) -> RentbookApp {
    let manager = ConfigManager::with_base_dir(base.to_path_buf()).expect("config manager");
    let config = manager.load().expect("load config");
    let storage = JsonBookStorage::with_retention(
        StoragePaths::under(&config.resolve_data_root(base)),
        config.backup_retention,
    )
    .expect("json storage");
    let (app, _report) =
        RentbookApp::with_storage(Box::new(storage), manager, config, Box::new(TickClock::new()))
            .expect("open app");
    app
}
