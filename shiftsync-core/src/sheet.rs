//! In-memory timesheet layout: sheets of day columns keyed by row label.

use std::collections::HashMap;

use crate::cell::RawCell;
use crate::constants::{DEFAULT_DATE_ROW, DEFAULT_HOURS_ROW, DEFAULT_START_ROW};

static EMPTY: RawCell = RawCell::Empty;

/// Labels of the rows the parser reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLabels {
    pub date: String,
    pub start: String,
    pub hours: String,
}

impl Default for RowLabels {
    fn default() -> Self {
        RowLabels {
            date: DEFAULT_DATE_ROW.to_string(),
            start: DEFAULT_START_ROW.to_string(),
            hours: DEFAULT_HOURS_ROW.to_string(),
        }
    }
}

/// One day column of a sheet.
#[derive(Debug, Clone, Default)]
pub struct DayColumn {
    pub id: String,
    cells: HashMap<String, RawCell>,
}

impl DayColumn {
    pub fn new(id: impl Into<String>) -> Self {
        DayColumn {
            id: id.into(),
            cells: HashMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests.
    pub fn with(mut self, label: impl Into<String>, cell: RawCell) -> Self {
        self.insert(label, cell);
        self
    }

    /// Insert a cell unless the label is already present.
    pub fn insert(&mut self, label: impl Into<String>, cell: RawCell) {
        self.cells.entry(label.into()).or_insert(cell);
    }

    /// The cell in the given row, `Empty` if the row is missing.
    pub fn get(&self, label: &str) -> &RawCell {
        self.cells.get(label).unwrap_or(&EMPTY)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<DayColumn>,
    labels: Vec<String>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_column(mut self, column: DayColumn) -> Self {
        self.push_column(column);
        self
    }

    pub fn push_column(&mut self, column: DayColumn) {
        for label in column.cells.keys() {
            self.note_label(label);
        }
        self.columns.push(column);
    }

    /// Record a row label even if no column has a cell for it.
    pub fn note_label(&mut self, label: &str) {
        if !self.has_label(label) {
            self.labels.push(label.to_string());
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// All sheets of a source, in workbook order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Workbook { sheets }
    }
}
