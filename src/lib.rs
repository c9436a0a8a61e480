//! # ocrbatch
//!
//! Batch OCR an image folder into per-file text outputs and a CSV report.
//!
//! ## What it does
//!
//! Point it at a folder of `png`/`jpg`/`jpeg` files and it runs each one
//! through an OCR engine, writes the recognised text to
//! `output/<timestamp>/files/<name>.txt`, and summarises the run in
//! `output/<timestamp>/report.csv`. One bad image never aborts the batch:
//! its report row carries the `ERROR` sentinel and processing continues.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input folder
//!  │
//!  ├─ 1. Scan     list entries, keep supported extensions (sorted)
//!  ├─ 2. Layout   derive output/<timestamp>/files from the wall clock
//!  ├─ 3. OCR      invoke the engine per file (spawn_blocking, bounded concurrency)
//!  ├─ 4. Write    one .txt per file, real newlines preserved
//!  └─ 5. Report   semicolon CSV, embedded newlines escaped as \n
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocrbatch::{run_batch, BatchConfig, BatchOutcome, TesseractCli};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Arc::new(TesseractCli::new("eng")?);
//!     let config = BatchConfig::default(); // ./input → ./output/<timestamp>
//!     match run_batch(engine, &config).await? {
//!         BatchOutcome::Completed(out) => {
//!             println!("{}/{} files ok, report at {}",
//!                 out.stats.processed_files,
//!                 out.stats.total_files,
//!                 out.report_path.display());
//!         }
//!         BatchOutcome::EmptyInputDir => println!("input folder is empty"),
//!         BatchOutcome::NoSupportedFiles => println!("no supported image files"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Bringing your own engine
//!
//! The OCR engine is a trait, [`OcrEngine`]; the crate ships
//! [`TesseractCli`], which shells out to the `tesseract` binary. Implement
//! the trait to plug in any other engine (or a stub in tests).
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocrbatch` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder, OutputFormat, DEFAULT_EXTENSIONS};
pub use engine::{OcrEngine, TesseractCli};
pub use error::{BatchError, EngineError, FileError};
pub use output::{BatchOutcome, BatchOutput, BatchStats, FileResult};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{Report, ReportRow, CELL_SEPARATOR, ERROR_MARKER, REPORT_HEADER};
pub use run::run_batch;
