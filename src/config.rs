//! Configuration for a batch OCR run.
//!
//! All run behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config across tasks and to see at a glance why two runs
//! produced different outputs.

use crate::error::BatchError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default allow-list of input file extensions.
///
/// Matching is case-sensitive and exact, against the suffix after the last
/// `.` in the file name. `photo.PNG` does not match.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Configuration for a batch OCR run.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use ocrbatch::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .input_dir("scans")
///     .language("deu")
///     .concurrency(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Folder scanned for input images. Default: `input`.
    pub input_dir: PathBuf,

    /// Parent folder for run output. Each run creates a timestamped
    /// subfolder under it. Default: `output`.
    pub output_root: PathBuf,

    /// Extensions eligible for processing, without the leading dot.
    /// Default: `png`, `jpg`, `jpeg`.
    pub extensions: Vec<String>,

    /// Language passed to the OCR engine at initialisation. Default: `eng`.
    pub language: String,

    /// Output format requested from the engine. Default: [`OutputFormat::Txt`].
    ///
    /// Whatever format is requested, the batch always persists the engine's
    /// plain-text result as a `.txt` file; formats other than `Txt` only
    /// change what engines that honour them return as that text.
    pub format: OutputFormat,

    /// Number of files recognised at the same time. Default: 1.
    ///
    /// The default is strictly sequential processing. Raising this overlaps
    /// engine invocations; the report row order stays deterministic because
    /// results are re-sorted into listing order.
    pub concurrency: usize,

    /// Optional per-file progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_root: PathBuf::from("output"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            language: "eng".to_string(),
            format: OutputFormat::default(),
            concurrency: 1,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_dir", &self.input_dir)
            .field("output_root", &self.output_root)
            .field("extensions", &self.extensions)
            .field("language", &self.language)
            .field("format", &self.format)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_root = dir.into();
        self
    }

    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(BatchError::InvalidConfig("Concurrency must be >= 1".into()));
        }
        if c.extensions.is_empty() {
            return Err(BatchError::InvalidConfig(
                "Extension allow-list must not be empty".into(),
            ));
        }
        if c.language.is_empty() {
            return Err(BatchError::InvalidConfig("Language must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Output format requested from the OCR engine.
///
/// These mirror the modes a tesseract-style engine understands. Regardless
/// of the requested format the batch persists plain text with a `.txt`
/// extension; only the text an engine returns may differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated word-level data (engines that support it).
    Tsv,
    /// Plain recognised text. (default)
    #[default]
    Txt,
    /// hOCR XHTML output.
    Hocr,
    /// Searchable-PDF mode.
    Pdf,
}

impl OutputFormat {
    /// The engine-facing name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Txt => "txt",
            OutputFormat::Hocr => "hocr",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
