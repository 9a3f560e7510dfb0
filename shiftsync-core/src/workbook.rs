//! Reading timesheets from spreadsheet files.
//!
//! Layout: the first row holds the column headers, the first column holds
//! the row labels, every other column is one day.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::cell::{self, RawCell};
use crate::error::{SyncError, SyncResult};
use crate::sheet::{DayColumn, Sheet, Workbook};

impl Workbook {
    /// Open an xlsx, xlsm, xls or ods file and read all of its sheets.
    pub fn open(path: &Path) -> SyncResult<Self> {
        let mut source = open_workbook_auto(path)
            .map_err(|e| SyncError::Workbook(format!("{}: {e}", path.display())))?;

        let mut sheets = Vec::new();
        for name in source.sheet_names() {
            let range = source
                .worksheet_range(&name)
                .map_err(|e| SyncError::Workbook(format!("Sheet '{name}': {e}")))?;
            let sheet = sheet_from_range(&name, &range);
            debug!(sheet = %name, columns = sheet.columns.len(), "Read sheet");
            sheets.push(sheet);
        }

        Ok(Workbook::new(sheets))
    }
}

pub(crate) fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return sheet;
    };

    let mut columns: Vec<DayColumn> = header
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, cell)| {
            let id = cell.to_string().trim().to_string();
            if id.is_empty() {
                DayColumn::new(format!("#{idx}"))
            } else {
                DayColumn::new(id)
            }
        })
        .collect();

    for row in rows {
        let Some(label_cell) = row.first() else {
            continue;
        };
        let label = label_cell.to_string().trim().to_string();
        if label.is_empty() || sheet.has_label(&label) {
            continue;
        }
        sheet.note_label(&label);

        for (column, value) in columns.iter_mut().zip(row.iter().skip(1)) {
            column.insert(label.clone(), raw_cell(value));
        }
    }

    for column in columns {
        sheet.push_column(column);
    }

    sheet
}

fn raw_cell(value: &Data) -> RawCell {
    match value {
        Data::Empty => RawCell::Empty,
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => {
            if let Some(duration) = dt.as_duration().filter(|_| dt.is_duration()) {
                return RawCell::Duration(duration);
            }
            let serial = dt.as_f64();
            match dt.as_datetime() {
                // Time-only cells are stored as a fraction of a day
                Some(datetime) if (0.0..1.0).contains(&serial) => RawCell::Time(datetime.time()),
                Some(datetime) => RawCell::DateTime(datetime),
                None => RawCell::Number(serial),
            }
        }
        Data::DateTimeIso(s) => iso_cell(s),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

fn iso_cell(s: &str) -> RawCell {
    if let Some(datetime) = cell::parse_datetime_str(s) {
        return RawCell::DateTime(datetime);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return RawCell::Date(date);
    }
    ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .map(RawCell::Time)
        .unwrap_or_else(|| RawCell::Text(s.to_string()))
}
