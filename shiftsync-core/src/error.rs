//! Error types for shiftsync.

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use thiserror::Error;

use crate::cell::CellError;

/// Errors that can occur in shiftsync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet '{sheet}', column '{column}': {source}")]
    Cell {
        sheet: String,
        column: String,
        #[source]
        source: CellError,
    },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Deleted {} on {date} but creating its replacement failed: {source}", .deleted.join(", "))]
    ReplaceFailed {
        date: NaiveDate,
        /// Ids of the events already removed from the calendar
        deleted: Vec<String>,
        #[source]
        source: Box<SyncError>,
    },

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("{0} does not exist in time zone {1}")]
    InvalidLocalTime(NaiveDateTime, Tz),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shiftsync operations.
pub type SyncResult<T> = Result<T, SyncError>;
