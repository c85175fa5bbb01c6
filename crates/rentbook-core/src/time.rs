use chrono::{DateTime, Utc};

use rentbook_domain::{BillingPeriod, PropertyBook};

/// Clock abstracts the timestamp stamped on new ledger entries so tests stay deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Supplies the "current" billing period used for overdue checks and summaries.
///
/// The ledger never reads a calendar on its own; whoever drives it picks the anchor.
pub trait PeriodAnchor: Send + Sync {
    fn current_period(&self, book: &PropertyBook) -> Option<BillingPeriod>;
}

/// Always answers with the same period, typically taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnchor(pub BillingPeriod);

impl PeriodAnchor for FixedAnchor {
    fn current_period(&self, _book: &PropertyBook) -> Option<BillingPeriod> {
        Some(self.0)
    }
}

/// The latest period any payment in the book was booked against.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatestRecordedAnchor;

impl PeriodAnchor for LatestRecordedAnchor {
    fn current_period(&self, book: &PropertyBook) -> Option<BillingPeriod> {
        book.latest_recorded_period()
    }
}

/// Tries each anchor in order and returns the first answer.
#[derive(Default)]
pub struct ChainedAnchor {
    anchors: Vec<Box<dyn PeriodAnchor>>,
}

impl ChainedAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, anchor: impl PeriodAnchor + 'static) -> Self {
        self.anchors.push(Box::new(anchor));
        self
    }
}

impl PeriodAnchor for ChainedAnchor {
    fn current_period(&self, book: &PropertyBook) -> Option<BillingPeriod> {
        self.anchors
            .iter()
            .find_map(|anchor| anchor.current_period(book))
    }
}
