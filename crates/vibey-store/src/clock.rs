//! Wall-clock access for day rollover.

use chrono::{DateTime, Datelike, Duration, Local, Utc};
use parking_lot::Mutex;

/// Source of the current time and of the calendar day used for rollover.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Day of the month that `at` falls on, in the clock's time zone.
    fn day_of_month(&self, at: DateTime<Utc>) -> u32;
}

/// System clock; days are evaluated in local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn day_of_month(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&Local).day()
    }
}

/// Settable clock; days are evaluated in UTC.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn day_of_month(&self, at: DateTime<Utc>) -> u32 {
        at.day()
    }
}
