//! The time entry: one worked shift on one day.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// A worked shift in local civil time.
///
/// `end` is always `start` plus a non-negative duration; the only way to
/// build one is [`TimeEntry::new`], which refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeEntry {
    /// Returns `None` for negative, non-finite or out-of-range durations.
    pub fn new(date: NaiveDate, start_time: NaiveTime, hours: f64) -> Option<Self> {
        let start = date.and_time(start_time);
        let end = start.checked_add_signed(hours_to_delta(hours)?)?;
        Some(TimeEntry { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.start.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )?;
        if self.end.date() != self.start.date() {
            write!(f, " (+{}d)", (self.end.date() - self.start.date()).num_days())?;
        }
        Ok(())
    }
}

fn hours_to_delta(hours: f64) -> Option<TimeDelta> {
    let micros = (hours * MICROS_PER_HOUR).round();
    if !micros.is_finite() || micros < 0.0 || micros >= i64::MAX as f64 {
        return None;
    }
    Some(TimeDelta::microseconds(micros as i64))
}
