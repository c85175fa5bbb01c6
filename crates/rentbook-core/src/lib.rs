//! rentbook-core
//!
//! Charge calculation, the rent ledger engine, and services over the property book.
//! Depends on rentbook-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod activity_service;
pub mod charge_service;
pub mod error;
pub mod ledger_engine;
pub mod pagination;
pub mod payment_service;
pub mod person_service;
pub mod room_service;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use activity_service::*;
pub use charge_service::*;
pub use error::CoreError;
pub use ledger_engine::*;
pub use pagination::*;
pub use payment_service::*;
pub use person_service::*;
pub use room_service::*;
pub use storage::{book_warnings, BookBackupInfo, PropertyStorage};
pub use summary_service::*;
pub use time::*;
