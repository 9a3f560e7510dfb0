//! Loading the sync configuration.
//!
//! The file is read with the `config` crate, so its format follows the file
//! extension (`config.toml`, or a legacy `config.ini` with the same
//! sections). `SHIFTSYNC__<SECTION>__<KEY>` environment variables (e.g.
//! `SHIFTSYNC__CALENDAR__SUMMARY`) override file values.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CALENDAR_ID, DEFAULT_DATE_ROW, DEFAULT_HOURS_ROW,
    DEFAULT_PROVIDER, DEFAULT_START_ROW, DEFAULT_TIME_ZONE,
};
use crate::error::{SyncError, SyncResult};
use crate::sheet::RowLabels;

const ENV_PREFIX: &str = "SHIFTSYNC";

#[derive(Debug, Deserialize)]
struct RawConfig {
    calendar: RawCalendar,
    excel: RawExcel,
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    #[serde(default = "default_calendar_id")]
    calendar_id: String,
    summary: String,
    description: String,
    #[serde(default)]
    replace_event: bool,
    #[serde(default = "default_time_zone")]
    time_zone: String,
    #[serde(default = "default_provider")]
    provider: String,
    account: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawExcel {
    excel_file: String,
    days_back: Option<u32>,
    #[serde(default = "default_date_row")]
    date_row: String,
    #[serde(default = "default_start_row")]
    start_row: String,
    #[serde(default = "default_hours_row")]
    hours_row: String,
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_date_row() -> String {
    DEFAULT_DATE_ROW.to_string()
}

fn default_start_row() -> String {
    DEFAULT_START_ROW.to_string()
}

fn default_hours_row() -> String {
    DEFAULT_HOURS_ROW.to_string()
}

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub calendar_id: String,
    pub summary: String,
    /// Identifies events created by shiftsync
    pub description: String,
    pub replace_event: bool,
    pub time_zone: Tz,
    pub provider: String,
    pub account: Option<String>,
    pub excel_file: PathBuf,
    pub days_back: Option<u32>,
    pub row_labels: RowLabels,
}

impl SyncConfig {
    /// `~/.config/shiftsync/config.toml` (or the platform equivalent).
    pub fn default_path() -> SyncResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn config_dir() -> SyncResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| SyncError::Config("Could not determine config directory".into()))?
            .join(APP_DIR_NAME))
    }

    pub fn load(path: &Path) -> SyncResult<Self> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment when given.
    fn load_with_env(path: &Path, env: Option<Map<String, String>>) -> SyncResult<Self> {
        let raw: RawConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").source(env))
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SyncError::Config(e.to_string()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::resolve(raw, base_dir)
    }

    fn resolve(raw: RawConfig, base_dir: &Path) -> SyncResult<Self> {
        let time_zone: Tz = raw.calendar.time_zone.trim().parse().map_err(|_| {
            SyncError::Config(format!("Unknown time zone '{}'", raw.calendar.time_zone))
        })?;

        let excel_file = resolve_path(&raw.excel.excel_file, base_dir);

        Ok(SyncConfig {
            calendar_id: raw.calendar.calendar_id,
            summary: raw.calendar.summary,
            description: raw.calendar.description,
            replace_event: raw.calendar.replace_event,
            time_zone,
            provider: raw.calendar.provider,
            account: raw.calendar.account.filter(|a| !a.trim().is_empty()),
            excel_file,
            days_back: raw.excel.days_back,
            row_labels: RowLabels {
                date: raw.excel.date_row,
                start: raw.excel.start_row,
                hours: raw.excel.hours_row,
            },
        })
    }

    /// Write a config file with every option explained.
    pub fn create_template(path: &Path) -> SyncResult<()> {
        let contents = format!(
            "\
# shiftsync configuration

[calendar]
# Calendar to write to (\"primary\" is your main Google calendar)
calendar_id = \"{DEFAULT_CALENDAR_ID}\"
summary = \"Work\"
# Events with this description are treated as created by shiftsync
description = \"shiftsync\"
# Replace existing events on the same day instead of skipping the day
replace_event = false
time_zone = \"{DEFAULT_TIME_ZONE}\"
provider = \"{DEFAULT_PROVIDER}\"
# Printed by `shiftsync auth`
# account = \"you@example.com\"

[excel]
# Relative paths are resolved against this file's directory
excel_file = \"~/Arbeitszeit.xlsx\"
# Only sync the last N days (0 or unset syncs everything)
# days_back = 30
# date_row = \"{DEFAULT_DATE_ROW}\"
# start_row = \"{DEFAULT_START_ROW}\"
# hours_row = \"{DEFAULT_HOURS_ROW}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyncError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SyncError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn resolve_path(raw: &str, base_dir: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw.trim()).into_owned());
    if expanded.is_relative() {
        base_dir.join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            r#"
[calendar]
summary = "Work"
description = "shiftsync"

[excel]
excel_file = "Arbeitszeit.xlsx"
"#,
        );

        let config = SyncConfig::load(&path).unwrap();

        assert_eq!(config.calendar_id, "primary");
        assert!(!config.replace_event);
        assert_eq!(config.time_zone, chrono_tz::Europe::Zurich);
        assert_eq!(config.provider, "google");
        assert_eq!(config.account, None);
        assert_eq!(config.days_back, None);
        assert_eq!(config.row_labels, RowLabels::default());
        assert_eq!(config.excel_file, dir.path().join("Arbeitszeit.xlsx"));
    }

    #[test]
    fn test_full_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            r#"
[calendar]
calendar_id = "work@group.calendar.google.com"
summary = "Schicht"
description = "from-excel"
replace_event = true
time_zone = "America/New_York"
account = "me@example.com"

[excel]
excel_file = "/data/hours.xlsx"
days_back = 14
hours_row = "Hours"
"#,
        );

        let config = SyncConfig::load(&path).unwrap();

        assert_eq!(config.calendar_id, "work@group.calendar.google.com");
        assert!(config.replace_event);
        assert_eq!(config.time_zone, chrono_tz::America::New_York);
        assert_eq!(config.account.as_deref(), Some("me@example.com"));
        assert_eq!(config.excel_file, PathBuf::from("/data/hours.xlsx"));
        assert_eq!(config.days_back, Some(14));
        assert_eq!(config.row_labels.hours, "Hours");
        assert_eq!(config.row_labels.date, "Datum");
    }

    #[test]
    fn test_ini_layout_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.ini",
            "[calendar]\n\
             calendar_id = primary\n\
             summary = Arbeit\n\
             description = excel\n\
             replace_event = true\n\
             \n\
             [excel]\n\
             excel_file = sheets/zeit.xlsx\n\
             days_back = 30\n",
        );

        let config = SyncConfig::load(&path).unwrap();

        assert_eq!(config.summary, "Arbeit");
        assert!(config.replace_event);
        assert_eq!(config.days_back, Some(30));
        assert_eq!(config.excel_file, dir.path().join("sheets/zeit.xlsx"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            r#"
[calendar]
summary = "Work"
description = "shiftsync"

[excel]
excel_file = "a.xlsx"
"#,
        );

        let env = Map::from([
            ("SHIFTSYNC__CALENDAR__SUMMARY".to_string(), "Nachtschicht".to_string()),
            // Single underscore after the prefix is not picked up
            ("SHIFTSYNC_CALENDAR__DESCRIPTION".to_string(), "ignored".to_string()),
        ]);
        let config = SyncConfig::load_with_env(&path, Some(env)).unwrap();

        assert_eq!(config.summary, "Nachtschicht");
        assert_eq!(config.description, "shiftsync");
    }

    #[test]
    fn test_unknown_time_zone_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            r#"
[calendar]
summary = "Work"
description = "shiftsync"
time_zone = "Mars/Olympus"

[excel]
excel_file = "a.xlsx"
"#,
        );

        let err = SyncConfig::load(&path).unwrap_err();
        assert!(matches!(err, SyncError::Config(ref msg) if msg.contains("Mars/Olympus")));
    }

    #[test]
    fn test_missing_keys_and_files_are_config_errors() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.toml", "[calendar]\nsummary = \"Work\"\n");
        assert!(matches!(SyncConfig::load(&path), Err(SyncError::Config(_))));

        let missing = dir.path().join("nope.toml");
        assert!(matches!(SyncConfig::load(&missing), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_template_is_written_with_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/shiftsync/config.toml");

        SyncConfig::create_template(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[calendar]"));
        assert!(contents.contains("[excel]"));

        // Template is loadable as-is
        let config = SyncConfig::load(&path).unwrap();
        assert_eq!(config.description, "shiftsync");
    }

    #[test]
    fn test_tilde_is_expanded() {
        let base = Path::new("/etc/shiftsync");
        let resolved = resolve_path("~/hours.xlsx", base);
        assert!(!resolved.starts_with("~"));
        assert_eq!(resolve_path("hours.xlsx", base), base.join("hours.xlsx"));
    }
}
