pub mod auth;
pub mod config;
pub mod entries;
pub mod sync;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use shiftsync_core::{SyncConfig, Workbook};

use crate::utils::tui;

pub fn open_workbook(config: &SyncConfig) -> Result<Workbook> {
    let path = &config.excel_file;
    let spinner = tui::create_spinner(format!("Reading {}", path.display()));
    let workbook = Workbook::open(path);
    spinner.finish_and_clear();

    workbook.with_context(|| format!("Failed to read {}", path.display()))
}

/// Today in the calendar's zone, not the machine's.
pub fn today(config: &SyncConfig) -> NaiveDate {
    Utc::now().with_timezone(&config.time_zone).date_naive()
}
