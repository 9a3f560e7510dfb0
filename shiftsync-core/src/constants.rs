/// Directory name under the platform config dir (~/.config/shiftsync)
pub const APP_DIR_NAME: &str = "shiftsync";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_DATE_ROW: &str = "Datum";
pub const DEFAULT_START_ROW: &str = "Start";
pub const DEFAULT_HOURS_ROW: &str = "Ist zeit";

pub const DEFAULT_TIME_ZONE: &str = "Europe/Zurich";

pub const DEFAULT_PROVIDER: &str = "google";

/// Google's alias for the user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";
