//! Error types for the ocrbatch library.
//!
//! Three distinct error types reflect three distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the run cannot proceed at all (input folder
//!   missing, engine binary not found, invalid configuration). Returned as
//!   `Err(BatchError)` from [`crate::run::run_batch`].
//!
//! * [`FileError`] — **Non-fatal**: a single input file failed (engine error,
//!   output-write error) but the batch continues. Stored inside
//!   [`crate::output::FileResult`] and reflected in the report as the
//!   `ERROR` sentinel row.
//!
//! * [`EngineError`] — the OCR adapter's own failure type, produced by
//!   [`crate::engine::OcrEngine::recognize`] and mapped into a [`FileError`]
//!   by the orchestrator.
//!
//! No error is re-raised after being handled: per-file errors are logged and
//! recorded, fatal errors abort the run with a user-visible message.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the ocrbatch library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input folder does not exist. Raised before any output folder is
    /// created.
    #[error("Input folder not found: '{path}'\nCreate it and put your image files inside.")]
    InputDirMissing { path: PathBuf },

    /// The input folder exists but could not be listed.
    #[error("Failed to read input folder '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The run's output folder could not be created.
    #[error("Failed to create output folder '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The OCR engine could not be initialised (binary missing, bad language).
    #[error("OCR engine '{engine}' is not available: {detail}")]
    EngineUnavailable { engine: String, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file.
///
/// Stored in [`crate::output::FileResult`] when a file fails. The batch
/// continues unless the input folder itself is unusable.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The OCR engine failed for this image.
    #[error("OCR failed for '{file}': {detail}")]
    RecognitionFailed { file: String, detail: String },

    /// The recognised text could not be written to the output file.
    #[error("Failed to write '{path}': {detail}")]
    WriteFailed { path: String, detail: String },
}

/// Errors produced by an [`crate::engine::OcrEngine`] implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine subprocess could not be launched.
    #[error("failed to launch '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but exited with a failure status.
    #[error("engine exited with {status}: {stderr}")]
    RecognitionFailed { status: String, stderr: String },

    /// The engine produced output that is not valid UTF-8.
    #[error("engine produced non-UTF-8 output for '{file}'")]
    InvalidOutput { file: String },
}
