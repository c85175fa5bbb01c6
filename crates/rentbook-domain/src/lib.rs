//! rentbook-domain
//!
//! Pure domain models (billing periods, charges, payment records, rooms, people, activity log).
//! No I/O, no CLI, no storage. Only data types, invariants, and core enums.

pub mod activity;
pub mod book;
pub mod calendar;
pub mod charge;
pub mod common;
pub mod payment;
pub mod person;
pub mod room;
pub mod tenancy;

pub use activity::*;
pub use book::*;
pub use calendar::*;
pub use charge::*;
pub use common::*;
pub use payment::*;
pub use person::*;
pub use room::*;
pub use tenancy::*;
