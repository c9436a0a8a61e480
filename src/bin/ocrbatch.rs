//! CLI binary for ocrbatch.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`,
//! renders per-file progress, and prints the run summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ocrbatch::{
    run_batch, BatchConfig, BatchOutcome, BatchProgressCallback, OutputFormat, ProgressCallback,
    TesseractCli,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per file.
/// Works correctly when files complete out-of-order (concurrency > 1).
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>3}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("OCR");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_files} files…"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, file_name: &str) {
        self.bar.set_message(file_name.to_string());
    }

    fn on_file_complete(&self, _index: usize, total: usize, file_name: &str, text_len: usize) {
        self.bar.println(format!(
            "  {} {:<30} {}  ({}/{})",
            green("✓"),
            file_name,
            dim(&format!("{text_len:>6} chars")),
            self.bar.position() + 1,
            total,
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, _index: usize, _total: usize, file_name: &str, error: &str) {
        let msg = truncate_for_log(error, 80);
        self.bar
            .println(format!("  {} {:<30} {}", red("✗"), file_name, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} {} files processed successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files processed  ({} failed)",
                if failed == total_files { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

/// Truncate a log message to at most `max` bytes, never splitting a
/// multi-byte character. Error messages embed file names and engine stderr,
/// so arbitrary UTF-8 must be assumed.
fn truncate_for_log(msg: &str, max: usize) -> String {
    if msg.len() <= max {
        return msg.to_string();
    }
    let mut end = max - 1;
    while !msg.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\u{2026}", &msg[..end])
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR every png/jpg/jpeg in ./input (writes under ./output/<timestamp>/)
  ocrbatch

  # A different input folder and language
  ocrbatch scans --lang deu

  # Four files at a time, structured JSON result
  ocrbatch -c 4 --json

  # Point at a specific tesseract binary
  ocrbatch --tesseract-path /opt/tesseract/bin/tesseract

OUTPUT LAYOUT:
  output/<timestamp>/files/<name>.txt   one per input file
  output/<timestamp>/report.csv         Input File Name;Output File Name;Parsed Content

  The report is semicolon-separated; newlines inside recognised text are
  escaped as the two characters \n. Per-file failures appear as
  <name>;ERROR;ERROR and never abort the batch.

SETUP:
  Install tesseract (plus language data) and make sure it is on PATH:
    Debian/Ubuntu:  apt install tesseract-ocr
    macOS:          brew install tesseract
"#;

/// Batch OCR an image folder into per-file text outputs and a CSV report.
#[derive(Parser, Debug)]
#[command(
    name = "ocrbatch",
    version,
    about = "Batch OCR an image folder into per-file text outputs and a CSV report",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the images to process.
    #[arg(default_value = "input")]
    input_dir: PathBuf,

    /// Parent folder for run output; each run creates a timestamped subfolder.
    #[arg(short, long, env = "OCRBATCH_OUTPUT", default_value = "output")]
    output_root: PathBuf,

    /// OCR language passed to the engine.
    #[arg(long, env = "OCRBATCH_LANG", default_value = "eng")]
    lang: String,

    /// Output format requested from the engine (the batch always persists .txt).
    #[arg(long, env = "OCRBATCH_FORMAT", value_enum, default_value = "txt")]
    format: FormatArg,

    /// Number of files recognised at the same time.
    #[arg(short, long, env = "OCRBATCH_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Path to the tesseract binary (default: found on PATH).
    #[arg(long, env = "OCRBATCH_TESSERACT")]
    tesseract_path: Option<PathBuf>,

    /// Output the structured run result as JSON instead of the summary.
    #[arg(long, env = "OCRBATCH_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "OCRBATCH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCRBATCH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCRBATCH_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Tsv,
    Txt,
    Hocr,
    Pdf,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Tsv => OutputFormat::Tsv,
            FormatArg::Txt => OutputFormat::Txt,
            FormatArg::Hocr => OutputFormat::Hocr,
            FormatArg::Pdf => OutputFormat::Pdf,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs; keep them for
    // --no-progress runs so the user still sees per-file messages.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build engine and config ──────────────────────────────────────────
    let engine = match cli.tesseract_path {
        Some(ref path) => TesseractCli::with_binary(path, &cli.lang),
        None => TesseractCli::new(&cli.lang),
    }
    .context("OCR engine setup failed")?;
    let engine = Arc::new(engine);

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let mut builder = BatchConfig::builder()
        .input_dir(&cli.input_dir)
        .output_root(&cli.output_root)
        .language(&cli.lang)
        .format(cli.format.into())
        .concurrency(cli.concurrency);
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    // Per-file failures are best-effort (exit 0); only fatal conditions
    // (missing input folder, unusable engine) exit non-zero.
    let outcome = run_batch(engine, &config).await?;

    match outcome {
        BatchOutcome::EmptyInputDir => {
            if !cli.quiet {
                println!("No files found in the input folder");
            }
        }
        BatchOutcome::NoSupportedFiles => {
            if !cli.quiet {
                println!("No files found in the input folder with supported extensions");
            }
        }
        BatchOutcome::Completed(output) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).context("Failed to serialise output")?
                );
            } else if !cli.quiet {
                eprintln!(
                    "{}  {}/{} files  {}ms  →  {}",
                    if output.stats.failed_files == 0 {
                        green("✔")
                    } else {
                        cyan("⚠")
                    },
                    output.stats.processed_files,
                    output.stats.total_files,
                    output.stats.total_duration_ms,
                    bold(&output.run_root.display().to_string()),
                );
                if output.report_written {
                    eprintln!("   report: {}", dim(&output.report_path.display().to_string()));
                } else {
                    eprintln!("   {} report could not be written", red("✗"));
                }
            }
        }
    }

    Ok(())
}
