//! Time source for seeding, booking timestamps and "today" defaults.

use chrono::{DateTime, NaiveDate, Utc};

/// Injectable wall clock.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant, for tests and reproducible probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freezes the clock at 09:00 UTC on `day`.
    pub fn at_day(day: NaiveDate) -> Self {
        Self(day.and_hms_opt(9, 0, 0).unwrap_or_default().and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
