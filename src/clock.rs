use chrono::{Local, NaiveDateTime};

/// Source of the report's generation time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Host wall clock in local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
