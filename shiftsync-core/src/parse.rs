//! Turning timesheet columns into time entries.

use std::fmt;

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::cell::{self, CellError};
use crate::entry::TimeEntry;
use crate::error::{SyncError, SyncResult};
use crate::sheet::{DayColumn, RowLabels, Sheet, Workbook};

/// Why a column did not produce an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoDate,
    InvalidDate(CellError),
    Future(NaiveDate),
    BeforeCutoff(NaiveDate),
    InvalidHours(CellError),
    NegativeHours(f64),
    NoStart,
    InvalidStart(CellError),
    OutOfRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoDate => write!(f, "no date"),
            SkipReason::InvalidDate(e) | SkipReason::InvalidHours(e) | SkipReason::InvalidStart(e) => {
                write!(f, "{e}")
            }
            SkipReason::Future(date) => write!(f, "{date} is in the future"),
            SkipReason::BeforeCutoff(date) => write!(f, "{date} is before the cutoff"),
            SkipReason::NegativeHours(hours) => write!(f, "negative hours ({hours})"),
            SkipReason::NoStart => write!(f, "no start time"),
            SkipReason::OutOfRange => write!(f, "end time out of range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnOutcome {
    Entry(TimeEntry),
    Skipped(SkipReason),
}

/// Parses timesheet columns relative to a fixed "today".
#[derive(Debug, Clone)]
pub struct EntryParser {
    today: NaiveDate,
    days_back: Option<u32>,
    labels: RowLabels,
}

impl EntryParser {
    pub fn new(today: NaiveDate, days_back: Option<u32>) -> Self {
        EntryParser {
            today,
            days_back,
            labels: RowLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: RowLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Oldest date still synced, if a recency window is set.
    ///
    /// `days_back = 0` turns the window off, like leaving it unset.
    pub fn cutoff(&self) -> Option<NaiveDate> {
        let days = self.days_back.filter(|&days| days > 0)?;
        // An absurdly large window reaches back past the calendar start
        Some(
            self.today
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Parse a single day column.
    ///
    /// Checks run in a fixed order: date, recency, hours, then start time.
    /// Hours are validated before the start cell is looked at; a column that
    /// has both bad hours and no start is reported as `InvalidHours` or
    /// `NegativeHours`.
    ///
    /// Only a start cell with an unsupported representation is an error.
    pub fn parse_column(&self, column: &DayColumn) -> Result<ColumnOutcome, CellError> {
        use ColumnOutcome::Skipped;

        let date = match cell::to_date(column.get(&self.labels.date)) {
            Ok(Some(date)) => date,
            Ok(None) => return Ok(Skipped(SkipReason::NoDate)),
            Err(e) => return Ok(Skipped(SkipReason::InvalidDate(e))),
        };

        if date > self.today {
            return Ok(Skipped(SkipReason::Future(date)));
        }

        if self.cutoff().is_some_and(|cutoff| date < cutoff) {
            return Ok(Skipped(SkipReason::BeforeCutoff(date)));
        }

        let hours = match cell::to_hours(column.get(&self.labels.hours)) {
            Ok(hours) if hours < 0.0 => return Ok(Skipped(SkipReason::NegativeHours(hours))),
            Ok(hours) => hours,
            Err(e) => return Ok(Skipped(SkipReason::InvalidHours(e))),
        };

        let start_time = match cell::to_time(column.get(&self.labels.start)) {
            Ok(Some(time)) => time,
            Ok(None) => return Ok(Skipped(SkipReason::NoStart)),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => return Ok(Skipped(SkipReason::InvalidStart(e))),
        };

        Ok(match TimeEntry::new(date, start_time, hours) {
            Some(entry) => ColumnOutcome::Entry(entry),
            None => Skipped(SkipReason::OutOfRange),
        })
    }

    /// Outcome of every column of a sheet, in column order.
    ///
    /// `None` when the sheet has no date row and so is not a timesheet.
    pub fn parse_sheet_outcomes<'s>(
        &self,
        sheet: &'s Sheet,
    ) -> SyncResult<Option<Vec<(&'s DayColumn, ColumnOutcome)>>> {
        if !sheet.has_label(&self.labels.date) {
            return Ok(None);
        }

        sheet
            .columns
            .iter()
            .map(|column| {
                self.parse_column(column)
                    .map(|outcome| (column, outcome))
                    .map_err(|source| SyncError::Cell {
                        sheet: sheet.name.clone(),
                        column: column.id.clone(),
                        source,
                    })
            })
            .collect::<SyncResult<Vec<_>>>()
            .map(Some)
    }

    /// Parse every column of a sheet, in column order.
    pub fn parse_sheet(&self, sheet: &Sheet) -> SyncResult<Vec<TimeEntry>> {
        let Some(outcomes) = self.parse_sheet_outcomes(sheet)? else {
            warn!(
                sheet = %sheet.name,
                "Sheet has no '{}' row, skipping", self.labels.date
            );
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();

        for (column, outcome) in outcomes {
            match outcome {
                ColumnOutcome::Entry(entry) => entries.push(entry),
                ColumnOutcome::Skipped(reason) => {
                    debug!(sheet = %sheet.name, column = %column.id, %reason, "Skipped column");
                }
            }
        }

        Ok(entries)
    }

    /// Parse all sheets and concatenate their entries in sheet order.
    ///
    /// The same day appearing on two sheets yields two entries; duplicates
    /// are resolved against the remote calendar, not here.
    pub fn parse_workbook(&self, workbook: &Workbook) -> SyncResult<Vec<TimeEntry>> {
        let mut all_entries = Vec::new();

        for sheet in &workbook.sheets {
            let entries = self.parse_sheet(sheet)?;
            debug!(sheet = %sheet.name, count = entries.len(), "Parsed sheet");
            all_entries.extend(entries);
        }

        Ok(all_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellKind, RawCell};
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 3, 5)
    }

    fn day(id: &str, datum: RawCell, start: RawCell, hours: RawCell) -> DayColumn {
        DayColumn::new(id)
            .with("Datum", datum)
            .with("Start", start)
            .with("Ist zeit", hours)
    }

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn valid_day(datum: &str) -> DayColumn {
        day(datum, text(datum), text("08:30"), RawCell::Number(8.5))
    }

    fn expect_entry(outcome: ColumnOutcome) -> TimeEntry {
        match outcome {
            ColumnOutcome::Entry(entry) => entry,
            ColumnOutcome::Skipped(reason) => panic!("expected entry, skipped: {reason}"),
        }
    }

    fn expect_skip(outcome: ColumnOutcome) -> SkipReason {
        match outcome {
            ColumnOutcome::Skipped(reason) => reason,
            ColumnOutcome::Entry(entry) => panic!("expected skip, got {entry}"),
        }
    }

    #[test]
    fn test_valid_column_produces_entry() {
        let parser = EntryParser::new(today(), None);
        let entry = expect_entry(parser.parse_column(&valid_day("2024-03-01")).unwrap());

        let start = date(2024, 3, 1).and_hms_opt(8, 30, 0).unwrap();
        let end = date(2024, 3, 1).and_hms_opt(17, 0, 0).unwrap();
        assert_eq!(entry.start(), start);
        assert_eq!(entry.end(), end);
        assert_eq!(entry.end() - entry.start(), chrono::TimeDelta::minutes(510));
    }

    #[test]
    fn test_today_is_included() {
        let parser = EntryParser::new(today(), None);
        expect_entry(parser.parse_column(&valid_day("2024-03-05")).unwrap());
    }

    #[test]
    fn test_future_date_is_skipped() {
        let parser = EntryParser::new(today(), None);
        let reason = expect_skip(parser.parse_column(&valid_day("2024-03-06")).unwrap());
        assert_eq!(reason, SkipReason::Future(date(2024, 3, 6)));
    }

    #[test]
    fn test_future_date_is_skipped_before_other_checks() {
        // Unsupported start cell would be fatal, but the date check comes first
        let parser = EntryParser::new(today(), None);
        let column = day("x", text("2024-03-06"), RawCell::Number(0.3), RawCell::Number(-1.0));
        let reason = expect_skip(parser.parse_column(&column).unwrap());
        assert!(matches!(reason, SkipReason::Future(_)));
    }

    #[test]
    fn test_cutoff_window() {
        let parser = EntryParser::new(today(), Some(3));
        assert_eq!(parser.cutoff(), Some(date(2024, 3, 2)));

        expect_entry(parser.parse_column(&valid_day("2024-03-02")).unwrap());
        let reason = expect_skip(parser.parse_column(&valid_day("2024-03-01")).unwrap());
        assert_eq!(reason, SkipReason::BeforeCutoff(date(2024, 3, 1)));
    }

    #[test]
    fn test_zero_days_back_means_no_cutoff() {
        let parser = EntryParser::new(today(), Some(0));
        assert_eq!(parser.cutoff(), None);

        expect_entry(parser.parse_column(&valid_day("2024-03-05")).unwrap());
        expect_entry(parser.parse_column(&valid_day("2023-01-02")).unwrap());
    }

    #[test]
    fn test_negative_hours_are_skipped() {
        let parser = EntryParser::new(today(), None);
        let column = day("x", text("2024-03-01"), text("08:30"), RawCell::Number(-1.0));
        let reason = expect_skip(parser.parse_column(&column).unwrap());
        assert_eq!(reason, SkipReason::NegativeHours(-1.0));
    }

    #[test]
    fn test_blank_date_or_start_is_skipped() {
        let parser = EntryParser::new(today(), None);

        let no_date = day("x", RawCell::Empty, text("08:30"), RawCell::Number(8.0));
        assert_eq!(expect_skip(parser.parse_column(&no_date).unwrap()), SkipReason::NoDate);

        let no_start = day("x", text("2024-03-01"), text("  "), RawCell::Number(8.0));
        assert_eq!(expect_skip(parser.parse_column(&no_start).unwrap()), SkipReason::NoStart);
    }

    #[test]
    fn test_bad_hours_win_over_missing_start() {
        let parser = EntryParser::new(today(), None);
        let column = day("x", text("2024-03-01"), RawCell::Empty, text("krank"));
        let reason = expect_skip(parser.parse_column(&column).unwrap());
        assert!(matches!(
            reason,
            SkipReason::InvalidHours(CellError::Parse { kind: CellKind::Hours, .. })
        ));
    }

    #[test]
    fn test_unparseable_date_is_skipped() {
        let parser = EntryParser::new(today(), None);
        let column = day("x", text("Ferien"), text("08:30"), RawCell::Number(8.0));
        assert!(matches!(
            expect_skip(parser.parse_column(&column).unwrap()),
            SkipReason::InvalidDate(_)
        ));
    }

    #[test]
    fn test_unsupported_start_is_an_error() {
        let parser = EntryParser::new(today(), None);
        let column = day("Fr", text("2024-03-01"), RawCell::Bool(true), RawCell::Number(8.0));
        assert!(parser.parse_column(&column).unwrap_err().is_fatal());

        let sheet = Sheet::new("März").with_column(column);
        match parser.parse_sheet(&sheet) {
            Err(SyncError::Cell { sheet, column, .. }) => {
                assert_eq!(sheet, "März");
                assert_eq!(column, "Fr");
            }
            other => panic!("expected cell error, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_cells() {
        let parser = EntryParser::new(today(), None);
        let column = day(
            "x",
            RawCell::DateTime(date(2024, 3, 4).and_hms_opt(0, 0, 0).unwrap()),
            RawCell::Time(NaiveTime::from_hms_opt(7, 0, 0).unwrap()),
            RawCell::Number(4.25),
        );
        let entry = expect_entry(parser.parse_column(&column).unwrap());
        assert_eq!(entry.end(), date(2024, 3, 4).and_hms_opt(11, 15, 0).unwrap());
    }

    #[test]
    fn test_sheet_keeps_column_order() {
        let parser = EntryParser::new(today(), None);
        let sheet = Sheet::new("März")
            .with_column(valid_day("2024-03-04"))
            .with_column(day("gap", RawCell::Empty, RawCell::Empty, RawCell::Empty))
            .with_column(valid_day("2024-03-01"));

        let dates: Vec<_> = parser
            .parse_sheet(&sheet)
            .unwrap()
            .iter()
            .map(TimeEntry::date)
            .collect();
        assert_eq!(dates, vec![date(2024, 3, 4), date(2024, 3, 1)]);
    }

    #[test]
    fn test_sheet_without_date_row_is_ignored() {
        let parser = EntryParser::new(today(), None);
        let notes = Sheet::new("Notizen").with_column(DayColumn::new("A").with("Text", text("hallo")));
        assert!(parser.parse_sheet(&notes).unwrap().is_empty());
    }

    #[test]
    fn test_sheet_outcomes_keep_skipped_columns() {
        let parser = EntryParser::new(today(), None);
        let sheet = Sheet::new("März")
            .with_column(valid_day("2024-03-04"))
            .with_column(valid_day("2024-03-06"));

        let outcomes = parser.parse_sheet_outcomes(&sheet).unwrap().unwrap();

        let ids: Vec<_> = outcomes.iter().map(|(column, _)| column.id.as_str()).collect();
        assert_eq!(ids, vec!["2024-03-04", "2024-03-06"]);
        assert!(matches!(outcomes[0].1, ColumnOutcome::Entry(_)));
        assert_eq!(
            outcomes[1].1,
            ColumnOutcome::Skipped(SkipReason::Future(date(2024, 3, 6)))
        );

        let notes = Sheet::new("Notizen").with_column(DayColumn::new("A").with("Text", text("hallo")));
        assert!(parser.parse_sheet_outcomes(&notes).unwrap().is_none());
    }

    #[test]
    fn test_sheet_outcomes_name_the_failing_column() {
        let parser = EntryParser::new(today(), None);
        let sheet = Sheet::new("März").with_column(day(
            "Mo",
            text("2024-03-04"),
            RawCell::Number(0.5),
            RawCell::Number(8.0),
        ));

        assert!(matches!(
            parser.parse_sheet_outcomes(&sheet),
            Err(SyncError::Cell { ref column, .. }) if column == "Mo"
        ));
    }

    #[test]
    fn test_custom_labels() {
        let labels = RowLabels {
            date: "Date".into(),
            start: "Begin".into(),
            hours: "Hours".into(),
        };
        let parser = EntryParser::new(today(), None).with_labels(labels);
        let column = DayColumn::new("Mon")
            .with("Date", text("2024-03-04"))
            .with("Begin", text("09:00"))
            .with("Hours", RawCell::Number(1.0));
        expect_entry(parser.parse_column(&column).unwrap());
    }

    #[test]
    fn test_workbook_concatenates_sheets_without_dedup() {
        let parser = EntryParser::new(today(), None);
        let workbook = Workbook::new(vec![
            Sheet::new("Februar").with_column(valid_day("2024-02-29")),
            Sheet::new("März")
                .with_column(valid_day("2024-03-01"))
                .with_column(valid_day("2024-03-01")),
        ]);

        let dates: Vec<_> = parser
            .parse_workbook(&workbook)
            .unwrap()
            .iter()
            .map(TimeEntry::date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 2, 29), date(2024, 3, 1), date(2024, 3, 1)]
        );
    }
}
