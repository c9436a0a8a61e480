//! Batch orchestration: one pass over the input folder.
//!
//! The orchestrator owns the order of effects. For each filtered file it
//! derives the output path, invokes the engine, writes the text, and records
//! a report row; a per-file failure is logged and recorded as an `ERROR`
//! row, never aborting the batch. After the last file it writes the CSV
//! report, whose own failure is also only logged.
//!
//! ## Concurrency
//!
//! Files are processed through `buffer_unordered(config.concurrency)`; the
//! default of 1 reproduces strictly sequential behaviour. Results carry
//! their listing index and are re-sorted before report assembly, so the
//! report order equals sorted listing order regardless of completion order.
//! The engine is injected as an owned `Arc<dyn OcrEngine>`: it is fully
//! initialised before the first `recognize` call and dropped only after the
//! last one has returned, on every exit path.

use crate::config::{BatchConfig, OutputFormat};
use crate::engine::OcrEngine;
use crate::error::{BatchError, FileError};
use crate::output::{BatchOutcome, BatchOutput, BatchStats, FileResult};
use crate::pipeline::{layout, scan};
use crate::report::Report;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run one batch over `config.input_dir`.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BatchOutcome)` for all three terminal states, including runs where
/// every file failed (check `output.stats.failed_files`).
///
/// # Errors
/// Returns `Err(BatchError)` only for fatal conditions: the input folder is
/// missing or unreadable, or the run's output folder could not be created.
/// No output folder exists when the input folder is missing.
///
/// # Example
/// ```rust,no_run
/// use ocrbatch::{run_batch, BatchConfig, BatchOutcome, TesseractCli};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let engine = Arc::new(TesseractCli::new("eng")?);
///     let config = BatchConfig::default();
///     match run_batch(engine, &config).await? {
///         BatchOutcome::Completed(output) => {
///             println!("report: {}", output.report_path.display());
///         }
///         _ => println!("nothing to do"),
///     }
///     Ok(())
/// }
/// ```
pub async fn run_batch(
    engine: Arc<dyn OcrEngine>,
    config: &BatchConfig,
) -> Result<BatchOutcome, BatchError> {
    let total_start = Instant::now();
    info!("Scanning input folder: {}", config.input_dir.display());

    // ── Step 1: List and filter ──────────────────────────────────────────
    let entries = scan::list_input_dir(&config.input_dir)?;
    if entries.is_empty() {
        info!("No files found in the input folder");
        return Ok(BatchOutcome::EmptyInputDir);
    }

    info!(
        "Filtering files in the input folder by extensions: {}",
        config.extensions.join(", ")
    );
    let files = scan::filter_supported(entries, &config.extensions);
    if files.is_empty() {
        info!("No files found in the input folder with supported extensions");
        return Ok(BatchOutcome::NoSupportedFiles);
    }
    info!(
        "Found {} files in the input folder with supported extensions",
        files.len()
    );

    // ── Step 2: Create the run's output layout ───────────────────────────
    let run_root = layout::run_root(&config.output_root, Utc::now());
    let files_dir = layout::files_dir(&run_root);
    tokio::fs::create_dir_all(&files_dir)
        .await
        .map_err(|e| BatchError::OutputDirFailed {
            path: files_dir.clone(),
            source: e,
        })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(files.len());
    }

    // ── Step 3: Process files ────────────────────────────────────────────
    let total = files.len();
    let mut indexed: Vec<(usize, FileResult)> = stream::iter(files.into_iter().enumerate().map(
        |(index, name)| {
            let engine = Arc::clone(&engine);
            let input_path = config.input_dir.join(&name);
            let output_path = layout::output_file(&files_dir, &name);
            let format = config.format;
            let callback = config.progress_callback.clone();
            async move {
                if let Some(ref cb) = callback {
                    cb.on_file_start(index, total, &name);
                }
                let result = process_file(engine, name, input_path, output_path, format).await;
                if let Some(ref cb) = callback {
                    match &result.error {
                        None => cb.on_file_complete(index, total, &result.input_name, result.text.len()),
                        Some(e) => cb.on_file_error(index, total, &result.input_name, &e.to_string()),
                    }
                }
                (index, result)
            }
        },
    ))
    .buffer_unordered(config.concurrency)
    .collect()
    .await;

    // Re-sort into listing order for a deterministic report.
    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<FileResult> = indexed.into_iter().map(|(_, r)| r).collect();

    // ── Step 4: Write the report ─────────────────────────────────────────
    let mut report = Report::new();
    for result in &results {
        report.push(result.report_row());
    }
    let report_path = layout::report_path(&run_root);
    let report_written = match tokio::fs::write(&report_path, report.to_csv()).await {
        Ok(()) => {
            info!("Successfully created CSV report {}", report_path.display());
            true
        }
        Err(e) => {
            // The run still ends normally; per-file outputs are retained.
            warn!("Error creating CSV report {}: {}", report_path.display(), e);
            false
        }
    };

    // ── Step 5: Stats and completion ─────────────────────────────────────
    let processed = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - processed;
    let stats = BatchStats {
        total_files: total,
        processed_files: processed,
        failed_files: failed,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Finished processing {} files in the input folder ({} ok, {} failed, {}ms)",
        total, processed, failed, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, processed);
    }

    Ok(BatchOutcome::Completed(BatchOutput {
        files: results,
        stats,
        run_root,
        report_path,
        report_written,
    }))
}

/// Recognise one file and persist its text.
///
/// Always returns a `FileResult`; engine and write failures are folded into
/// `result.error` so one bad file never aborts the batch. The engine call
/// runs under `spawn_blocking` because `OcrEngine::recognize` is a blocking
/// subprocess or FFI call.
async fn process_file(
    engine: Arc<dyn OcrEngine>,
    input_name: String,
    input_path: PathBuf,
    output_path: PathBuf,
    format: OutputFormat,
) -> FileResult {
    let start = Instant::now();
    debug!(
        "Processing file: {} in format of {}",
        input_name, format
    );

    let recognized = {
        let image = input_path.clone();
        tokio::task::spawn_blocking(move || engine.recognize(&image, format)).await
    };

    let outcome = match recognized {
        Ok(Ok(text)) => write_output(&output_path, text).await,
        Ok(Err(e)) => Err(FileError::RecognitionFailed {
            file: input_name.clone(),
            detail: e.to_string(),
        }),
        Err(e) => Err(FileError::RecognitionFailed {
            file: input_name.clone(),
            detail: format!("engine task panicked: {e}"),
        }),
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(text) => {
            debug!("Wrote output to file: {}", output_path.display());
            FileResult {
                input_name,
                output_path: output_path.display().to_string(),
                text,
                duration_ms,
                error: None,
            }
        }
        Err(error) => {
            warn!("{}", error);
            FileResult {
                input_name,
                output_path: output_path.display().to_string(),
                text: String::new(),
                duration_ms,
                error: Some(error),
            }
        }
    }
}

/// Full-content overwrite write of the recognised text.
///
/// Real newlines are preserved here; the `\n` escaping applies only to the
/// CSV report.
async fn write_output(path: &Path, text: String) -> Result<String, FileError> {
    match tokio::fs::write(path, &text).await {
        Ok(()) => Ok(text),
        Err(e) => Err(FileError::WriteFailed {
            path: path.display().to_string(),
            detail: e.to_string(),
        }),
    }
}
