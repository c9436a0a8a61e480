//! End-to-end tests for ocrbatch.
//!
//! All scenarios run against an in-process stub engine in temporary
//! directories, so they are fast and need no tesseract installation. One
//! optional test exercises the real binary and is gated behind the
//! `OCRBATCH_E2E_TESSERACT` environment variable.

use ocrbatch::{
    run_batch, BatchConfig, BatchError, BatchOutcome, BatchProgressCallback, EngineError,
    FileError, OcrEngine, OutputFormat, TesseractCli,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Engine stub returning canned text (or a canned failure) per file name.
struct StubEngine {
    responses: HashMap<String, Result<String, String>>,
}

impl StubEngine {
    fn new<I>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (&'static str, Result<&'static str, &'static str>)>,
    {
        Arc::new(Self {
            responses: responses
                .into_iter()
                .map(|(k, v)| {
                    (
                        k.to_string(),
                        v.map(str::to_string).map_err(str::to_string),
                    )
                })
                .collect(),
        })
    }

    /// Stub for runs that never reach the engine.
    fn empty() -> Arc<Self> {
        Arc::new(Self {
            responses: HashMap::new(),
        })
    }
}

impl OcrEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn recognize(&self, image: &Path, _format: OutputFormat) -> Result<String, EngineError> {
        let name = image.file_name().unwrap().to_string_lossy().to_string();
        match self.responses.get(&name) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(detail)) => Err(EngineError::RecognitionFailed {
                status: "exit status: 1".to_string(),
                stderr: detail.clone(),
            }),
            None => panic!("stub engine asked about unexpected file {name}"),
        }
    }
}

/// A workspace with an `input` dir (seeded with the given file names) and an
/// empty `output` root, plus a config pointing at both.
fn workspace(files: &[&str]) -> (TempDir, BatchConfig) {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input");
    std::fs::create_dir(&input).unwrap();
    for name in files {
        // Content is irrelevant to the stub engine.
        std::fs::write(input.join(name), b"\x89PNG fake image bytes").unwrap();
    }
    let config = BatchConfig::builder()
        .input_dir(&input)
        .output_root(tmp.path().join("output"))
        .build()
        .unwrap();
    (tmp, config)
}

fn completed(outcome: BatchOutcome) -> ocrbatch::BatchOutput {
    match outcome {
        BatchOutcome::Completed(output) => output,
        other => panic!("expected Completed, got {other:?}"),
    }
}

/// The single timestamped run root created under `output_root`.
fn sole_run_root(output_root: &Path) -> PathBuf {
    let mut entries = std::fs::read_dir(output_root).unwrap();
    let entry = entries.next().expect("run root should exist").unwrap();
    assert!(entries.next().is_none(), "expected exactly one run root");
    entry.path()
}

/// Progress callback that plants a directory at `relative` inside the run
/// root, so the write to that path fails with EISDIR. `on_batch_start` fires
/// after the run layout exists and before the first write, which makes the
/// collision deterministic without guessing the timestamp.
struct OccupyPath {
    output_root: PathBuf,
    relative: &'static str,
}

impl BatchProgressCallback for OccupyPath {
    fn on_batch_start(&self, _total_files: usize) {
        let target = sole_run_root(&self.output_root).join(self.relative);
        std::fs::create_dir_all(target).unwrap();
    }
}

// ── Terminal states ──────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_input_dir_is_fatal_and_creates_no_output() {
    let tmp = TempDir::new().unwrap();
    let config = BatchConfig::builder()
        .input_dir(tmp.path().join("does-not-exist"))
        .output_root(tmp.path().join("output"))
        .build()
        .unwrap();

    let engine = StubEngine::empty();
    let result = run_batch(engine, &config).await;
    assert!(matches!(result, Err(BatchError::InputDirMissing { .. })));
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn empty_input_dir_is_a_no_op() {
    let (tmp, config) = workspace(&[]);
    let outcome = run_batch(StubEngine::empty(), &config).await.unwrap();
    assert!(matches!(outcome, BatchOutcome::EmptyInputDir));
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn unsupported_extensions_only_is_a_no_op() {
    // Extension matching is case-sensitive: photo.PNG does not count.
    let (tmp, config) = workspace(&["photo.PNG", "notes.txt", "README"]);
    let outcome = run_batch(StubEngine::empty(), &config).await.unwrap();
    assert!(matches!(outcome, BatchOutcome::NoSupportedFiles));
    assert!(!tmp.path().join("output").exists());
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn single_file_end_to_end() {
    let (_tmp, config) = workspace(&["sample.jpg"]);
    let engine = StubEngine::new([("sample.jpg", Ok("Hello\nWorld"))]);

    let output = completed(run_batch(engine, &config).await.unwrap());
    assert_eq!(output.stats.total_files, 1);
    assert_eq!(output.stats.processed_files, 1);
    assert_eq!(output.stats.failed_files, 0);
    assert!(output.report_written);

    // The .txt artifact keeps the real newline.
    let txt_path = output.run_root.join("files").join("sample.txt");
    let txt = std::fs::read_to_string(&txt_path).unwrap();
    assert_eq!(txt, "Hello\nWorld");

    // The report escapes it as the two characters \n.
    let csv = std::fs::read_to_string(&output.report_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Input File Name;Output File Name;Parsed Content");
    assert_eq!(
        lines[1],
        format!("sample.jpg;{};Hello\\nWorld", txt_path.display())
    );
    assert_eq!(lines.len(), 2);
    assert!(csv.ends_with('\n'));
}

#[tokio::test]
async fn only_supported_extensions_are_processed() {
    let (_tmp, config) = workspace(&["a.png", "b.jpg", "c.txt"]);
    let engine = StubEngine::new([("a.png", Ok("ay")), ("b.jpg", Ok("bee"))]);

    let output = completed(run_batch(engine, &config).await.unwrap());
    assert_eq!(output.stats.total_files, 2);

    let csv = std::fs::read_to_string(&output.report_path).unwrap();
    assert!(csv.contains("a.png;"));
    assert!(csv.contains("b.jpg;"));
    assert!(!csv.contains("c.txt"));
    assert_eq!(csv.lines().count(), 3); // header + two rows
}

// ── Failure isolation ────────────────────────────────────────────────────────

#[tokio::test]
async fn one_failure_among_three_marks_only_that_row() {
    let (_tmp, config) = workspace(&["a.png", "b.jpg", "c.jpeg"]);
    let engine = StubEngine::new([
        ("a.png", Ok("alpha")),
        ("b.jpg", Err("segfault in engine")),
        ("c.jpeg", Ok("gamma")),
    ]);

    let output = completed(run_batch(engine, &config).await.unwrap());
    assert_eq!(output.stats.total_files, 3);
    assert_eq!(output.stats.processed_files, 2);
    assert_eq!(output.stats.failed_files, 1);

    let csv = std::fs::read_to_string(&output.report_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);

    // Failed row: second and third fields are exactly ERROR.
    let failed: Vec<&str> = lines[2].split(';').collect();
    assert_eq!(failed, vec!["b.jpg", "ERROR", "ERROR"]);

    // The other rows carry real paths and text.
    assert!(lines[1].starts_with("a.png;"));
    assert!(lines[1].ends_with(";alpha"));
    assert!(lines[3].starts_with("c.jpeg;"));
    assert!(lines[3].ends_with(";gamma"));

    // No .txt artifact exists for the failed file.
    assert!(!output.run_root.join("files").join("b.txt").exists());
}

#[tokio::test]
async fn output_write_failure_marks_row_and_batch_continues() {
    let (_tmp, base) = workspace(&["a.png", "b.jpg"]);
    let config = BatchConfig::builder()
        .input_dir(&base.input_dir)
        .output_root(&base.output_root)
        .progress_callback(Arc::new(OccupyPath {
            output_root: base.output_root.clone(),
            relative: "files/a.txt",
        }))
        .build()
        .unwrap();
    let engine = StubEngine::new([("a.png", Ok("alpha")), ("b.jpg", Ok("beta"))]);

    let output = completed(run_batch(engine, &config).await.unwrap());
    assert_eq!(output.stats.processed_files, 1);
    assert_eq!(output.stats.failed_files, 1);
    assert!(matches!(
        output.files[0].error,
        Some(FileError::WriteFailed { .. })
    ));

    // The failed write is an ERROR row; the other file still goes through.
    let csv = std::fs::read_to_string(&output.report_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[1], "a.png;ERROR;ERROR");
    assert!(lines[2].starts_with("b.jpg;"));
    assert!(lines[2].ends_with(";beta"));
}

#[tokio::test]
async fn report_write_failure_is_non_fatal_and_keeps_outputs() {
    let (_tmp, base) = workspace(&["a.png"]);
    let config = BatchConfig::builder()
        .input_dir(&base.input_dir)
        .output_root(&base.output_root)
        .progress_callback(Arc::new(OccupyPath {
            output_root: base.output_root.clone(),
            relative: "report.csv",
        }))
        .build()
        .unwrap();
    let engine = StubEngine::new([("a.png", Ok("alpha"))]);

    let output = completed(run_batch(engine, &config).await.unwrap());
    assert!(!output.report_written);
    assert_eq!(output.stats.processed_files, 1);
    assert_eq!(output.stats.failed_files, 0);

    // Per-file outputs are retained even when the report cannot be written.
    let txt = std::fs::read_to_string(output.run_root.join("files").join("a.txt")).unwrap();
    assert_eq!(txt, "alpha");
}

// ── Ordering ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn report_order_is_sorted_even_with_concurrency() {
    let (_tmp, base) = workspace(&["d.png", "a.png", "c.jpg", "b.jpeg"]);
    let config = BatchConfig::builder()
        .input_dir(&base.input_dir)
        .output_root(&base.output_root)
        .concurrency(4)
        .build()
        .unwrap();
    let engine = StubEngine::new([
        ("a.png", Ok("1")),
        ("b.jpeg", Ok("2")),
        ("c.jpg", Ok("3")),
        ("d.png", Ok("4")),
    ]);

    let output = completed(run_batch(engine, &config).await.unwrap());
    let inputs: Vec<&str> = output.files.iter().map(|f| f.input_name.as_str()).collect();
    assert_eq!(inputs, vec!["a.png", "b.jpeg", "c.jpg", "d.png"]);

    let csv = std::fs::read_to_string(&output.report_path).unwrap();
    let firsts: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|l| l.split(';').next().unwrap())
        .collect();
    assert_eq!(firsts, vec!["a.png", "b.jpeg", "c.jpg", "d.png"]);
}

// ── Run-folder behaviour ─────────────────────────────────────────────────────

#[tokio::test]
async fn colliding_run_roots_merge_deterministically() {
    let (_tmp, config) = workspace(&["a.png"]);
    let engine = StubEngine::new([("a.png", Ok("first"))]);
    let first = completed(run_batch(Arc::clone(&engine) as Arc<dyn OcrEngine>, &config).await.unwrap());

    // A rerun inside the same second must reuse the existing folder and
    // overwrite rather than fail.
    let engine2 = StubEngine::new([("a.png", Ok("second"))]);
    let second = completed(run_batch(engine2, &config).await.unwrap());

    if first.run_root == second.run_root {
        let txt = std::fs::read_to_string(second.run_root.join("files").join("a.txt")).unwrap();
        assert_eq!(txt, "second");
    } else {
        // The clock ticked over; both roots exist independently.
        assert!(first.run_root.exists());
        assert!(second.run_root.exists());
    }
}

#[tokio::test]
async fn output_stem_truncates_at_first_dot() {
    let (_tmp, config) = workspace(&["a.b.png"]);
    let engine = StubEngine::new([("a.b.png", Ok("text"))]);
    let output = completed(run_batch(engine, &config).await.unwrap());
    assert!(output.run_root.join("files").join("a.txt").exists());
}

// ── Real engine (opt-in) ─────────────────────────────────────────────────────

#[tokio::test]
async fn real_tesseract_smoke() {
    if std::env::var("OCRBATCH_E2E_TESSERACT").is_err() {
        println!("SKIP — set OCRBATCH_E2E_TESSERACT=1 (requires tesseract on PATH)");
        return;
    }
    let engine = TesseractCli::new("eng").expect("tesseract should be installed for this test");
    assert_eq!(engine.name(), "tesseract");
    assert_eq!(engine.language(), "eng");
}
