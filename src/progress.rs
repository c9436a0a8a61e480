//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive
//! real-time events as the batch works through the input folder. Callbacks
//! are the least-invasive integration point: a caller can forward events to
//! a terminal progress bar, a log, or a channel without the library knowing
//! how the host application communicates.

use std::sync::Arc;

/// Called by the orchestrator as it processes each input file.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` the
/// per-file methods may fire from different tasks. All methods have default
/// no-op implementations so callers only override what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after filtering, before the first file is processed.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is handed to the OCR engine.
    ///
    /// `index` is 0-based listing order.
    fn on_file_start(&self, index: usize, total_files: usize, file_name: &str) {
        let _ = (index, total_files, file_name);
    }

    /// Called when a file's text was recognised and written successfully.
    fn on_file_complete(&self, index: usize, total_files: usize, file_name: &str, text_len: usize) {
        let _ = (index, total_files, file_name, text_len);
    }

    /// Called when a file failed (engine error or write error).
    fn on_file_error(&self, index: usize, total_files: usize, file_name: &str, error: &str) {
        let _ = (index, total_files, file_name, error);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
