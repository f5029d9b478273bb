//! Wall-clock source.
//!
//! The farm never reads the system clock itself; it asks a [`Clock`] so tests
//! can drive time by hand.

use chrono::{Local, NaiveDateTime, NaiveTime};

pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn current_date(&self) -> NaiveDateTime;

    /// Current local time of day.
    fn current_time(&self) -> NaiveTime {
        self.current_date().time()
    }
}

/// [`Clock`] backed by the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_date(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
