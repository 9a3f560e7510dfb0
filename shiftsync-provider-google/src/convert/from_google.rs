use anyhow::{Result, bail};
use shiftsync_core::event::{EventTime, RemoteEvent};

use super::FromGoogle;

impl FromGoogle<google_calendar::types::Event> for RemoteEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let Some(start) = event.start.as_ref().and_then(event_time_from_google) else {
            bail!("Event {} has no start time", event.id);
        };
        let Some(end) = event.end.as_ref().and_then(event_time_from_google) else {
            bail!("Event {} has no end time", event.id);
        };

        Ok(RemoteEvent {
            id: event.id,
            summary: event.summary,
            description: non_empty(event.description),
            start,
            end,
            html_link: non_empty(event.html_link),
        })
    }
}

fn event_time_from_google(time: &google_calendar::types::EventDateTime) -> Option<EventTime> {
    time.date_time
        .map(EventTime::DateTime)
        .or_else(|| time.date.map(EventTime::Date))
}

/// Google sends absent text fields as empty strings.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use google_calendar::types::{Event, EventDateTime};

    fn at(h: u32) -> EventDateTime {
        EventDateTime {
            date: None,
            date_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()),
            time_zone: "Europe/Zurich".into(),
        }
    }

    #[test]
    fn test_timed_event() {
        let event = Event {
            id: "abc".into(),
            summary: "Work".into(),
            description: "shiftsync".into(),
            html_link: "https://calendar.google.com/event?eid=abc".into(),
            start: Some(at(7)),
            end: Some(at(16)),
            ..Default::default()
        };

        let remote = RemoteEvent::from_google(event).unwrap();

        assert_eq!(remote.id, "abc");
        assert_eq!(remote.description.as_deref(), Some("shiftsync"));
        assert_eq!(
            remote.start,
            EventTime::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap())
        );
        assert!(remote.html_link.is_some());
    }

    #[test]
    fn test_all_day_event_without_description() {
        let day = |d| EventDateTime {
            date: NaiveDate::from_ymd_opt(2024, 3, d),
            date_time: None,
            time_zone: String::new(),
        };
        let event = Event {
            id: "holiday".into(),
            start: Some(day(1)),
            end: Some(day(2)),
            ..Default::default()
        };

        let remote = RemoteEvent::from_google(event).unwrap();

        assert_eq!(remote.description, None);
        assert_eq!(remote.html_link, None);
        assert_eq!(remote.end, EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
    }

    #[test]
    fn test_event_without_times_is_rejected() {
        let event = Event {
            id: "broken".into(),
            ..Default::default()
        };
        assert!(RemoteEvent::from_google(event).is_err());
    }
}
