//! File export and import.
//!
//! Exports are named `schedule_v3_YYYY-MM-DD.json` after the UTC calendar
//! date and contain the pretty-printed current-generation document.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use super::codec::{deserialize, to_json_pretty, LoadOptions, Loaded};
use crate::error::{Result, TimetableError};
use crate::models::{AssignmentStore, Configuration};

/// Fixed file-name prefix for exports.
pub const EXPORT_PREFIX: &str = "schedule_v3_";

/// Export file name for a given date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}{}.json", EXPORT_PREFIX, date.format("%Y-%m-%d"))
}

/// Writes the document into `dir` under today's (UTC) export name.
///
/// An existing file of the same name is overwritten.
pub fn export_to_dir(dir: &Path, config: &Configuration, store: &AssignmentStore) -> Result<PathBuf> {
    let today = chrono::Utc::now().date_naive();
    let path = dir.join(export_file_name(today));
    save_to_path(&path, config, store)?;
    Ok(path)
}

/// Writes the document to `path`.
pub fn save_to_path(path: &Path, config: &Configuration, store: &AssignmentStore) -> Result<()> {
    let text = to_json_pretty(config, store)?;
    fs::write(path, text).map_err(|e| TimetableError::io(path, e))?;
    tracing::info!(path = %path.display(), records = store.len(), "document written");
    Ok(())
}

/// Reads and decodes the document at `path`.
pub fn import_file(path: &Path, current: &Configuration, options: &LoadOptions) -> Result<Loaded> {
    let text = fs::read_to_string(path).map_err(|e| TimetableError::io(path, e))?;
    deserialize(&text, current, options)
}
