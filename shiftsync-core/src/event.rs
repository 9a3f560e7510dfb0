//! Provider-neutral calendar event types.
//!
//! Providers convert their API responses into [`RemoteEvent`]s and accept
//! [`NewEvent`]s for inserts. The reconciler works exclusively with these.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::entry::TimeEntry;
use crate::error::{SyncError, SyncResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    /// Calendar date of this time as seen in `tz`.
    pub fn date_in(&self, tz: Tz) -> NaiveDate {
        match self {
            EventTime::DateTime(dt) => dt.with_timezone(&tz).date_naive(),
            EventTime::Date(d) => *d,
        }
    }
}

/// An event that already exists on the remote calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    /// Link to the event in the provider's web UI
    pub html_link: Option<String>,
}

impl RemoteEvent {
    /// A missing description compares equal to the empty string.
    pub fn has_description(&self, description: &str) -> bool {
        self.description.as_deref().unwrap_or("") == description
    }
}

/// Payload for inserting an event.
///
/// Times stay naive local times in `time_zone` until the provider emits
/// them, so the calendar shows the zone the shift was worked in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub time_zone: Tz,
}

impl NewEvent {
    pub fn from_entry(entry: &TimeEntry, summary: &str, description: &str, time_zone: Tz) -> Self {
        NewEvent {
            summary: summary.to_string(),
            description: description.to_string(),
            start: entry.start(),
            end: entry.end(),
            time_zone,
        }
    }

    pub fn start_utc(&self) -> SyncResult<DateTime<Utc>> {
        localize(self.time_zone, self.start)
    }

    pub fn end_utc(&self) -> SyncResult<DateTime<Utc>> {
        localize(self.time_zone, self.end)
    }
}

/// One local calendar day, `[midnight, next midnight)`, as UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate, tz: Tz) -> SyncResult<Self> {
        let midnight = date.and_time(NaiveTime::MIN);
        let next = date
            .succ_opt()
            .ok_or(SyncError::InvalidLocalTime(midnight, tz))?;

        Ok(DayWindow {
            start: localize(tz, midnight)?,
            end: localize(tz, next.and_time(NaiveTime::MIN))?,
        })
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start_rfc3339(), self.end_rfc3339())
    }
}

/// Resolve a local wall-clock time in `tz` to an instant.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant. Times
/// inside a spring-forward gap are shifted forward by an hour.
pub fn localize(tz: Tz, local: NaiveDateTime) -> SyncResult<DateTime<Utc>> {
    let resolved = tz.from_local_datetime(&local).earliest().or_else(|| {
        local
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
    });

    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(SyncError::InvalidLocalTime(local, tz))
}
