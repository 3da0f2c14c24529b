use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::backend::{OcrEngine, OcrError, OcrSession};
use crate::process::{run_with_deadline, CommandError};

/// OCR engine backed by the `tesseract` command-line tool.
///
/// Session start probes `tesseract --version` once, so a missing or
/// broken install fails before any page work; each page then runs
/// `tesseract <image> stdout -l <lang>` under a bounded deadline.
pub struct TesseractOcr {
    binary: String,
    language: String,
    timeout: Duration,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Tesseract language code, e.g. `"eng"` or `"deu+eng"`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Per-image recognition deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl OcrEngine for TesseractOcr {
    fn start_session(&self) -> Result<Box<dyn OcrSession + '_>, OcrError> {
        let mut probe = Command::new(&self.binary);
        probe.arg("--version");
        // --version output lands on stderr on some builds; only the exit
        // status matters here.
        match run_with_deadline(probe, Duration::from_secs(10)) {
            Ok(out) if out.status.success() => {}
            Ok(out) => {
                return Err(OcrError::Unavailable(format!(
                    "{} --version exited with {}",
                    self.binary, out.status
                )));
            }
            Err(CommandError::NotFound { program }) => {
                return Err(OcrError::Unavailable(format!(
                    "{program} not found (is tesseract-ocr installed?)"
                )));
            }
            Err(e) => return Err(OcrError::Unavailable(e.to_string())),
        }

        tracing::debug!(binary = %self.binary, language = %self.language, "OCR session started");
        Ok(Box::new(TesseractSession { engine: self }))
    }
}

struct TesseractSession<'a> {
    engine: &'a TesseractOcr,
}

impl OcrSession for TesseractSession<'_> {
    fn recognize(&mut self, image: &Path) -> Result<String, OcrError> {
        let mut cmd = Command::new(&self.engine.binary);
        cmd.arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.engine.language);

        let output = run_with_deadline(cmd, self.engine.timeout).map_err(|e| match e {
            CommandError::TimedOut { secs, .. } => OcrError::TimedOut { secs },
            other => OcrError::Recognition(other.to_string()),
        })?;

        if !output.status.success() {
            return Err(OcrError::Recognition(format!(
                "{} exited with {}: {}",
                self.engine.binary,
                output.status,
                output.stderr_line()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| OcrError::Recognition(format!("invalid UTF-8 in OCR output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_fails_at_session_start() {
        let engine = TesseractOcr::new().with_binary("doctext-no-such-tesseract");
        let err = engine.start_session().err().unwrap();
        assert!(matches!(err, OcrError::Unavailable(_)));
        assert!(err.to_string().contains("doctext-no-such-tesseract"));
    }

    #[test]
    fn builder_overrides_apply() {
        let engine = TesseractOcr::new()
            .with_language("deu+eng")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(engine.language, "deu+eng");
        assert_eq!(engine.timeout, Duration::from_secs(5));
    }
}
