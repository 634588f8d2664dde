//! # Injected Clock
//!
//! The register never reads the ambient wall clock directly. Everything that
//! needs "now" or "today" takes a [`Clock`], so staleness checks and date
//! bucketing are deterministic under test.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of the current instant and the current local calendar date.
///
/// `today` is the *local* date: sales are bucketed by the shopkeeper's day,
/// not by the UTC day, so a sale at 23:30 local lands on the local date even
/// when UTC has already rolled over.
pub trait Clock: Send + Sync {
    /// The current UTC instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Test clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// Pins the clock to a given UTC instant; `today` is that instant's
    /// UTC date.
    pub fn at(now: DateTime<Utc>) -> Self {
        FixedClock {
            now,
            today: now.date_naive(),
        }
    }

    /// Pins the clock with the local date set independently of the instant
    /// (for exercising the UTC/local boundary).
    pub fn at_with_date(now: DateTime<Utc>, today: NaiveDate) -> Self {
        FixedClock { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
