use chrono::{Local, NaiveDate};
use std::fmt::Debug;

/// Supplies "today", used to date freshly reset drafts.
pub trait Clock: Debug + Send {
    fn today(&self) -> NaiveDate;
}

/// Today according to the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stopped on one date.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
