//! OCR engine abstraction and the tesseract CLI adapter.
//!
//! The recognition engine is an external collaborator: the batch only relies
//! on the contract "given an image path, return the recognised text". The
//! [`OcrEngine`] trait captures that contract; [`TesseractCli`] implements it
//! by shelling out to the `tesseract` binary.
//!
//! ## Lifecycle
//!
//! Construction is initialisation: [`TesseractCli::new`] fixes the language
//! and probes the binary, so a misconfigured engine fails before the batch
//! touches any file. Release happens on drop, which the orchestrator's
//! ownership guarantees on every exit path, including a fatal
//! missing-input-folder error.
//!
//! `recognize` is a blocking call; the orchestrator runs it under
//! `tokio::task::spawn_blocking` so engine work never stalls the async
//! executor.

use crate::config::OutputFormat;
use crate::error::{BatchError, EngineError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Contract consumed by the batch orchestrator.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` the
/// orchestrator calls `recognize` from several blocking tasks at once.
pub trait OcrEngine: Send + Sync {
    /// Engine identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Recognise the text in the image at `image`, requesting `format`.
    ///
    /// Returns the extracted text. Engines that do not distinguish formats
    /// may ignore `format` and return plain text.
    fn recognize(&self, image: &Path, format: OutputFormat) -> Result<String, EngineError>;
}

/// OCR via the `tesseract` command-line binary.
///
/// Each `recognize` call runs `tesseract <image> stdout -l <lang> [config]`
/// and captures stdout. No state persists between calls, so the adapter is
/// trivially `Send + Sync`.
pub struct TesseractCli {
    binary: PathBuf,
    language: String,
}

impl TesseractCli {
    /// Initialise the adapter: fix the language and verify the binary runs.
    ///
    /// Probing `tesseract --version` up front turns a missing installation
    /// into a fatal [`BatchError::EngineUnavailable`] before any file is
    /// processed, instead of one `ERROR` row per file.
    pub fn new(language: impl Into<String>) -> Result<Self, BatchError> {
        Self::with_binary("tesseract", language)
    }

    /// Like [`TesseractCli::new`] but with an explicit binary path.
    pub fn with_binary(binary: impl Into<PathBuf>, language: impl Into<String>) -> Result<Self, BatchError> {
        let binary = binary.into();
        let probe = Command::new(&binary).arg("--version").output();
        match probe {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout);
                debug!(
                    "tesseract available: {}",
                    version.lines().next().unwrap_or("unknown version")
                );
            }
            Ok(out) => {
                return Err(BatchError::EngineUnavailable {
                    engine: "tesseract".to_string(),
                    detail: format!("'{} --version' exited with {}", binary.display(), out.status),
                });
            }
            Err(e) => {
                return Err(BatchError::EngineUnavailable {
                    engine: "tesseract".to_string(),
                    detail: format!("failed to run '{}': {}", binary.display(), e),
                });
            }
        }

        Ok(Self {
            binary,
            language: language.into(),
        })
    }

    /// The language this engine was initialised with.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &Path, format: OutputFormat) -> Result<String, EngineError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(image).arg("stdout").arg("-l").arg(&self.language);
        // Plain text is tesseract's default stdout mode; the other formats
        // map to its config-file names.
        if format != OutputFormat::Txt {
            cmd.arg(format.as_str());
        }

        let output = cmd.output().map_err(|e| EngineError::SpawnFailed {
            command: self.binary.display().to_string(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(EngineError::RecognitionFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| EngineError::InvalidOutput {
            file: image.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_fatal_at_construction() {
        let result = TesseractCli::with_binary("/definitely/not/tesseract", "eng");
        assert!(matches!(result, Err(BatchError::EngineUnavailable { .. })));
    }

    #[test]
    fn trait_object_is_usable() {
        struct Fixed;
        impl OcrEngine for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn recognize(&self, _image: &Path, _format: OutputFormat) -> Result<String, EngineError> {
                Ok("text".to_string())
            }
        }

        let engine: Box<dyn OcrEngine> = Box::new(Fixed);
        assert_eq!(engine.name(), "fixed");
        assert_eq!(
            engine.recognize(Path::new("x.png"), OutputFormat::Txt).unwrap(),
            "text"
        );
    }
}
