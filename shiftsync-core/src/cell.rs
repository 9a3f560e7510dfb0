//! Raw spreadsheet cells and their normalization.
//!
//! A timesheet cell can hold almost anything: a real date, a date that the
//! spreadsheet stores as a serial number, a typed-in string, a time-of-day, a
//! duration. `RawCell` names every representation we accept, and the three
//! `to_*` functions turn a cell into the value a given row needs.
//!
//! Blank cells are reported as `Ok(None)` (absent) rather than an error, so
//! callers can tell "nothing here" apart from "something unreadable here".

use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use thiserror::Error;

/// Date formats accepted in text cells, tried in order.
///
/// `%d.%m.%y` comes before `%d.%m.%Y` so that "01.03.24" is not read as
/// the year 24.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%y", "%d.%m.%Y", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%H:%M:%S%.f", "%I:%M %p", "%I:%M:%S %p"];

/// Largest serial number Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// A cell value as it comes out of the spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Duration(TimeDelta),
    /// Spreadsheet error value such as `#N/A`
    Error(String),
}

impl RawCell {
    /// Name of the representation, used in error messages.
    pub fn representation(&self) -> &'static str {
        match self {
            RawCell::Empty => "empty",
            RawCell::Number(_) => "number",
            RawCell::Text(_) => "text",
            RawCell::Bool(_) => "boolean",
            RawCell::Date(_) => "date",
            RawCell::DateTime(_) => "date-time",
            RawCell::Time(_) => "time",
            RawCell::Duration(_) => "duration",
            RawCell::Error(_) => "error",
        }
    }

    /// Empty cells and whitespace-only text count as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => write!(f, ""),
            RawCell::Number(n) => write!(f, "{n}"),
            RawCell::Text(s) => write!(f, "{s}"),
            RawCell::Bool(b) => write!(f, "{b}"),
            RawCell::Date(d) => write!(f, "{d}"),
            RawCell::DateTime(dt) => write!(f, "{dt}"),
            RawCell::Time(t) => write!(f, "{t}"),
            RawCell::Duration(d) => write!(f, "{d}"),
            RawCell::Error(e) => write!(f, "{e}"),
        }
    }
}

/// The semantic kind a cell is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Date,
    Time,
    Hours,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Date => write!(f, "date"),
            CellKind::Time => write!(f, "time of day"),
            CellKind::Hours => write!(f, "number of hours"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    /// The cell has a known representation but its content is unreadable.
    #[error("cannot read '{value}' as a {kind}")]
    Parse { kind: CellKind, value: String },

    /// There is no rule for turning this representation into the kind.
    #[error("unsupported {kind} format: {representation} cell")]
    Unsupported {
        kind: CellKind,
        representation: &'static str,
    },
}

impl CellError {
    fn parse(kind: CellKind, cell: &RawCell) -> Self {
        CellError::Parse {
            kind,
            value: cell.to_string(),
        }
    }

    /// Whether this error should abort the run instead of skipping the cell.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CellError::Unsupported { .. })
    }
}

/// Normalize a cell to a calendar date.
pub fn to_date(cell: &RawCell) -> Result<Option<NaiveDate>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }

    let date = match cell {
        RawCell::Date(d) => Some(*d),
        RawCell::DateTime(dt) => Some(dt.date()),
        RawCell::Number(n) => excel_serial_to_date(*n),
        RawCell::Text(s) => parse_date_str(s.trim()),
        RawCell::Empty
        | RawCell::Bool(_)
        | RawCell::Time(_)
        | RawCell::Duration(_)
        | RawCell::Error(_) => None,
    };

    date.map(Some)
        .ok_or_else(|| CellError::parse(CellKind::Date, cell))
}

/// Normalize a cell to a time of day.
///
/// Unlike dates and hours, a cell holding a representation with no time
/// rule (a bare number, a boolean, ...) is `Unsupported` and not merely
/// unreadable.
pub fn to_time(cell: &RawCell) -> Result<Option<NaiveTime>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }

    match cell {
        RawCell::Time(t) => Ok(Some(*t)),
        RawCell::DateTime(dt) => Ok(Some(dt.time())),
        RawCell::Text(s) => parse_time_str(s.trim())
            .map(Some)
            .ok_or_else(|| CellError::parse(CellKind::Time, cell)),
        RawCell::Empty
        | RawCell::Number(_)
        | RawCell::Bool(_)
        | RawCell::Date(_)
        | RawCell::Duration(_)
        | RawCell::Error(_) => Err(CellError::Unsupported {
            kind: CellKind::Time,
            representation: cell.representation(),
        }),
    }
}

/// Normalize a cell to a (possibly negative) number of hours.
pub fn to_hours(cell: &RawCell) -> Result<f64, CellError> {
    let hours = match cell {
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => s.trim().parse::<f64>().ok(),
        RawCell::Duration(d) => Some(d.num_milliseconds() as f64 / 3_600_000.0),
        RawCell::Empty
        | RawCell::Bool(_)
        | RawCell::Date(_)
        | RawCell::DateTime(_)
        | RawCell::Time(_)
        | RawCell::Error(_) => None,
    };

    hours
        .filter(|h| h.is_finite())
        .ok_or_else(|| CellError::parse(CellKind::Hours, cell))
}

/// Interpret a number as an Excel serial date (days since 1899-12-30).
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| parse_datetime_str(s).map(|dt| dt.date()))
}

fn parse_time_str(s: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_datetime_str(s).map(|dt| dt.time()))
}

pub(crate) fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
