//! Run-folder layout: the timestamped root, its `files` subfolder, and the
//! per-file output paths.
//!
//! One run owns one root folder, `<output_root>/<timestamp>`, derived once
//! from the wall clock and immutable afterwards. The timestamp is ISO-8601
//! UTC truncated to seconds, with the fractional part and the `Z` suffix
//! dropped. Two runs inside the same second share a root; `create_dir_all`
//! is idempotent and later writes overwrite, so a collision merges
//! deterministically instead of failing.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Timestamp format of the run root folder name.
const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Name of the subfolder holding the per-file text outputs.
const FILES_SUBFOLDER: &str = "files";

/// Name of the summary report written at the run root.
pub const REPORT_FILE_NAME: &str = "report.csv";

/// Folder name for a run starting at `now`.
pub fn run_folder_name(now: DateTime<Utc>) -> String {
    now.format(RUN_TIMESTAMP_FORMAT).to_string()
}

/// `<output_root>/<timestamp>` for a run starting at `now`.
pub fn run_root(output_root: &Path, now: DateTime<Utc>) -> PathBuf {
    output_root.join(run_folder_name(now))
}

/// The `files` subfolder of a run root.
pub fn files_dir(run_root: &Path) -> PathBuf {
    run_root.join(FILES_SUBFOLDER)
}

/// `<run root>/report.csv`.
pub fn report_path(run_root: &Path) -> PathBuf {
    run_root.join(REPORT_FILE_NAME)
}

/// Output path for one input file: the name up to the first `.`, with a
/// `.txt` suffix, inside the files subfolder.
pub fn output_file(files_dir: &Path, input_name: &str) -> PathBuf {
    let stem = input_name.split('.').next().unwrap_or(input_name);
    files_dir.join(format!("{stem}.txt"))
}
