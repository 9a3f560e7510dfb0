//! Core of shiftsync: timesheet workbooks in, calendar events out.
//!
//! - `cell`, `parse`: normalize raw spreadsheet cells into time entries
//! - `reconcile`, `sync`: apply entries to a calendar without duplicating days
//! - `remote`: the JSON protocol spoken with provider binaries

pub mod backend;
pub mod cell;
pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod event;
pub mod parse;
pub mod reconcile;
pub mod remote;
pub mod sheet;
pub mod sync;
pub mod workbook;

#[cfg(test)]
mod test_support;

pub use backend::CalendarBackend;
pub use config::SyncConfig;
pub use entry::TimeEntry;
pub use error::{SyncError, SyncResult};
pub use event::{DayWindow, EventTime, NewEvent, RemoteEvent};
pub use parse::{ColumnOutcome, EntryParser, SkipReason};
pub use reconcile::{Outcome, Reconciler, SyncReport};
pub use sheet::{DayColumn, RowLabels, Sheet, Workbook};
