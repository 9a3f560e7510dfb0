use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shiftsync_core::event::NewEvent;

use super::ToGoogle;

impl ToGoogle<google_calendar::types::Event> for NewEvent {
    fn to_google(&self) -> Result<google_calendar::types::Event> {
        Ok(google_calendar::types::Event {
            summary: self.summary.clone(),
            description: self.description.clone(),
            start: Some(zoned(self.start_utc()?, self.time_zone)),
            end: Some(zoned(self.end_utc()?, self.time_zone)),
            ..Default::default()
        })
    }
}

/// The instant plus the zone name, so Google shows local wall-clock time.
fn zoned(instant: DateTime<Utc>, tz: Tz) -> google_calendar::types::EventDateTime {
    google_calendar::types::EventDateTime {
        date: None,
        date_time: Some(instant),
        time_zone: tz.name().to_string(),
    }
}
