//! Output path computation
//!
//! Pure: the same pattern, date, and week always produce the same path.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Fill `{date}` (YYYY-MM-DD) and `{week}` into the filename pattern under
/// the output directory.
pub fn output_path(directory: &Path, pattern: &str, date: NaiveDate, week: &str) -> PathBuf {
    let filename = pattern
        .replace("{date}", &date.format("%Y-%m-%d").to_string())
        .replace("{week}", week);
    directory.join(filename)
}
