//! Fixed operational settings for the AutoSleep pipeline.

use chrono::Datelike;

pub const S3_BUCKET: &str = "etl-airflow-autosleep";
pub const S3_KEY: &str = "data.csv";
pub const UPLOAD_FILE: &str = "data.csv";
pub const TABLE_PREFIX: &str = "autosleep";
pub const DEFAULT_DB_PATH: &str = "autosleep.db";

/// Columns taken from the export, in projection order. Anything else in the
/// file is discarded at extraction.
pub const SOURCE_COLUMNS: [&str; 7] = [
    "toDate",
    "waketime",
    "asleep",
    "efficiency",
    "quality",
    "deep",
    "SpO2Avg",
];

/// Canonical column order: duration-like columns first, percentage-like last.
/// Must match the persisted table layout exactly.
pub const CANONICAL_COLUMNS: [&str; 7] = [
    "date",
    "wakeup_time",
    "hours_slept",
    "quality_sleep_time",
    "deep_sleep_time",
    "sleep_efficiency",
    "oxygen_saturation_average",
];

pub fn table_name(year: i32) -> String {
    format!("{TABLE_PREFIX}_{year}")
}

/// The load runs once per year, just after year-end, over the prior year's
/// export, so the target table is always labeled with last year.
pub fn target_year() -> i32 {
    chrono::Local::now().year() - 1
}
