use std::sync::Mutex;

use std::path::PathBuf;

use crate::backend::CalendarBackend;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::event::{DayWindow, EventTime, NewEvent, RemoteEvent};
use crate::sheet::RowLabels;

pub fn sync_config(replace_event: bool) -> SyncConfig {
    SyncConfig {
        calendar_id: "primary".into(),
        summary: "Work".into(),
        description: "shiftsync".into(),
        replace_event,
        time_zone: chrono_tz::Europe::Zurich,
        provider: "google".into(),
        account: None,
        excel_file: PathBuf::from("Arbeitszeit.xlsx"),
        days_back: None,
        row_labels: RowLabels::default(),
    }
}

/// In-memory calendar, single calendar id, events kept sorted by start.
#[derive(Debug, Default)]
pub struct MemoryCalendar {
    events: Mutex<Vec<RemoteEvent>>,
    next_id: Mutex<u32>,
    fail_inserts: bool,
    calls: Mutex<Vec<String>>,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_inserts() -> Self {
        MemoryCalendar {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, event: RemoteEvent) {
        let mut events = self.events.lock().unwrap();
        events.push(event);
        events.sort_by_key(|e| instant(&e.start));
    }

    pub fn events(&self) -> Vec<RemoteEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn instant(time: &EventTime) -> chrono::DateTime<chrono::Utc> {
    match time {
        EventTime::DateTime(dt) => *dt,
        EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
    }
}

impl CalendarBackend for MemoryCalendar {
    async fn list_events(&self, _calendar_id: &str, window: &DayWindow) -> SyncResult<Vec<RemoteEvent>> {
        self.record(format!("list {}", window.start_rfc3339()));
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| instant(&e.start) < window.end && instant(&e.end) > window.start)
            .cloned()
            .collect())
    }

    async fn insert_event(&self, _calendar_id: &str, event: &NewEvent) -> SyncResult<RemoteEvent> {
        self.record(format!("insert {}", event.start));
        if self.fail_inserts {
            return Err(SyncError::Provider("insert rejected".into()));
        }

        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };

        let created = RemoteEvent {
            id: format!("evt{id}"),
            summary: event.summary.clone(),
            description: Some(event.description.clone()),
            start: EventTime::DateTime(event.start_utc()?),
            end: EventTime::DateTime(event.end_utc()?),
            html_link: None,
        };
        self.seed(created.clone());
        Ok(created)
    }

    async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> SyncResult<()> {
        self.record(format!("delete {event_id}"));
        self.events.lock().unwrap().retain(|e| e.id != event_id);
        Ok(())
    }
}
