//! Clock adapter for "now" and day-boundary arithmetic.
//!
//! Streak and prediction semantics depend entirely on "what day is it", so
//! the calendar is injected rather than read ambiently. The timezone policy
//! is pinned to device-local midnight: a day ends when the local clock
//! crosses 00:00, regardless of UTC offset.

use std::cell::Cell;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// Source of the current instant and the current calendar day.
pub trait Clock {
    /// Current instant, UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day under the device-local midnight policy.
    fn today(&self) -> NaiveDate;
}

/// Production clock. `today()` is the device-local calendar date.
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

/// Settable clock for tests. `now()` is pinned to local midnight of the
/// held date so that `now()` and `today()` stay consistent.
#[derive(Debug)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Cell::new(today),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }

    pub fn advance_days(&self, days: u64) {
        self.today.set(self.today.get() + chrono::Days::new(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let midnight = self.today.get().and_hms_opt(0, 0, 0).unwrap_or_default();
        match Local.from_local_datetime(&midnight) {
            chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
                dt.with_timezone(&Utc)
            }
            chrono::LocalResult::None => Utc::now(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}
