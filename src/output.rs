//! Result types returned by a batch run.
//!
//! A run has three terminal states, captured by [`BatchOutcome`]: the input
//! folder held nothing at all, it held nothing with a supported extension,
//! or the batch actually ran. The first two are informational, not errors,
//! and no output folder exists for them.

use crate::error::FileError;
use crate::report::{Report, ReportRow};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a batch run ended.
#[derive(Debug, Serialize)]
pub enum BatchOutcome {
    /// The input folder exists but contains no files.
    EmptyInputDir,
    /// Files exist but none carries a supported extension.
    NoSupportedFiles,
    /// At least one file was processed (possibly with per-file failures).
    Completed(BatchOutput),
}

/// The full result of a completed batch run.
#[derive(Debug, Serialize)]
pub struct BatchOutput {
    /// Per-file results, in report order.
    pub files: Vec<FileResult>,
    /// Aggregate counters and timings.
    pub stats: BatchStats,
    /// The timestamped folder scoping this run's artifacts.
    pub run_root: PathBuf,
    /// Where `report.csv` was (or would have been) written.
    pub report_path: PathBuf,
    /// False when the final report write failed; the run still completed
    /// and the per-file outputs already on disk are retained.
    pub report_written: bool,
}

/// Result of processing one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// Input file name (no directory component).
    pub input_name: String,
    /// The output path computed for this file. Kept here even on failure;
    /// the report row replaces it with the `ERROR` sentinel.
    pub output_path: String,
    /// Recognised text. Empty on failure.
    pub text: String,
    /// Wall-clock time spent on this file, engine call plus write.
    pub duration_ms: u64,
    /// Set when the engine or the output write failed.
    pub error: Option<FileError>,
}

impl FileResult {
    /// Project this result onto its report row.
    pub fn report_row(&self) -> ReportRow {
        match self.error {
            None => ReportRow::ok(&self.input_name, &self.output_path, &self.text),
            Some(_) => ReportRow::error(&self.input_name),
        }
    }
}

/// Aggregate statistics for a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Files that survived extension filtering.
    pub total_files: usize,
    /// Files recognised and written without error.
    pub processed_files: usize,
    /// Files that ended in an `ERROR` report row.
    pub failed_files: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
}

impl BatchOutput {
    /// Rebuild the [`Report`] from the per-file results.
    pub fn report(&self) -> Report {
        let mut report = Report::new();
        for file in &self.files {
            report.push(file.report_row());
        }
        report
    }
}
