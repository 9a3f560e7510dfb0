//! Reconciling time entries against the remote calendar.
//!
//! An entry's remote counterpart is any event on the same local day whose
//! description equals the configured one. Depending on `replace_event`,
//! counterparts are either replaced or make the entry a no-op. Running the
//! same workbook twice therefore never duplicates events.

use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::backend::CalendarBackend;
use crate::config::SyncConfig;
use crate::entry::TimeEntry;
use crate::error::{SyncError, SyncResult};
use crate::event::{DayWindow, NewEvent, RemoteEvent};

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created {
        entry: TimeEntry,
        event: RemoteEvent,
        /// Matching events deleted before the insert
        replaced: Vec<RemoteEvent>,
    },
    Skipped {
        entry: TimeEntry,
        existing: Vec<RemoteEvent>,
    },
}

impl Outcome {
    pub fn entry(&self) -> &TimeEntry {
        match self {
            Outcome::Created { entry, .. } | Outcome::Skipped { entry, .. } => entry,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub deleted: usize,
    pub skipped: usize,
}

impl SyncReport {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created { replaced, .. } => {
                self.created += 1;
                self.deleted += replaced.len();
            }
            Outcome::Skipped { .. } => self.skipped += 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.deleted == 0 && self.skipped == 0
    }
}

pub struct Reconciler<'a, B> {
    backend: &'a B,
    calendar_id: &'a str,
    summary: &'a str,
    description: &'a str,
    replace_event: bool,
    time_zone: Tz,
}

impl<'a, B: CalendarBackend> Reconciler<'a, B> {
    pub fn new(backend: &'a B, config: &'a SyncConfig) -> Self {
        Reconciler {
            backend,
            calendar_id: &config.calendar_id,
            summary: &config.summary,
            description: &config.description,
            replace_event: config.replace_event,
            time_zone: config.time_zone,
        }
    }

    /// Bring the calendar in line with one entry.
    ///
    /// Backend errors propagate as-is, except that an insert failing after
    /// matches were deleted becomes `SyncError::ReplaceFailed`, naming the
    /// deleted events.
    pub async fn reconcile(&self, entry: &TimeEntry) -> SyncResult<Outcome> {
        let window = DayWindow::for_date(entry.date(), self.time_zone)?;
        debug!(%window, "Listing events");

        let matches: Vec<RemoteEvent> = self
            .backend
            .list_events(self.calendar_id, &window)
            .await?
            .into_iter()
            .filter(|event| event.has_description(self.description))
            .collect();

        if !matches.is_empty() && !self.replace_event {
            info!(date = %entry.date(), count = matches.len(), "Event already exists, skipping");
            return Ok(Outcome::Skipped {
                entry: entry.clone(),
                existing: matches,
            });
        }

        for event in &matches {
            self.backend.delete_event(self.calendar_id, &event.id).await?;
            info!(id = %event.id, date = %entry.date(), "Deleted event");
        }

        let new_event = NewEvent::from_entry(entry, self.summary, self.description, self.time_zone);
        let event = match self.backend.insert_event(self.calendar_id, &new_event).await {
            Ok(event) => event,
            Err(source) if !matches.is_empty() => {
                let deleted: Vec<String> = matches.into_iter().map(|event| event.id).collect();
                warn!(date = %entry.date(), ?deleted, error = %source, "Insert failed after deleting events");
                return Err(SyncError::ReplaceFailed {
                    date: entry.date(),
                    deleted,
                    source: Box::new(source),
                });
            }
            Err(e) => return Err(e),
        };
        info!(id = %event.id, %entry, "Created event");

        Ok(Outcome::Created {
            entry: entry.clone(),
            event,
            replaced: matches,
        })
    }
}
