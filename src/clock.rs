//! Wall clock used for fallback timestamps and generated file names

use chrono::{Local, NaiveDateTime};

pub trait Clock {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Milliseconds since the Unix epoch
    fn epoch_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn epoch_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn epoch_millis(&self) -> i64 {
        self.now.and_utc().timestamp_millis()
    }
}
