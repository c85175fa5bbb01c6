#![doc(test(attr(deny(warnings))))]

//! Rentbook keeps the books for a small rental property: rooms, tenants, and the
//! month-by-month rent ledger on the Bikram Sambat calendar.

pub mod app;
pub mod cli;
pub mod errors;
pub mod utils;

pub use app::RentbookApp;
pub use errors::{CliError, RentbookError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("rentbook tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
