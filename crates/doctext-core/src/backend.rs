use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfReadError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
}

/// Trait for PDF page readers.
///
/// Implementors provide the low-level open / page-count / page-text
/// capability; everything above it (scanned detection, text-layer
/// assembly, OCR dispatch) lives in this crate and is backend-agnostic.
/// The production implementation is `MupdfReader` in `doctext-pdf-mupdf`.
pub trait PdfReader: Send + Sync {
    /// Open a PDF and return a scoped page handle. The handle owns the
    /// underlying file resources and releases them on drop.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfPages>, PdfReadError>;
}

/// A scoped handle over one open PDF document.
///
/// Page numbers are 1-based throughout the pipeline (they end up in
/// user-facing error messages and match pdftoppm's output numbering).
pub trait PdfPages {
    fn page_count(&self) -> u32;

    /// Plain text of the given page. `Ok(None)` marks a structurally
    /// empty page (no content object); those are skipped without error.
    /// Backends that cannot distinguish empty pages return `Some`.
    fn text_of(&mut self, page: u32) -> Result<Option<String>, PdfReadError>;
}

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("{tool} not found (is poppler-utils installed?)")]
    ToolMissing { tool: String },
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("{tool} timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },
    #[error("no page images produced")]
    NoPages,
    #[error("page image {page} missing (rasterizer output is not contiguous)")]
    MissingPage { page: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for page rasterization backends.
///
/// Converts every page of a PDF into one image file inside `dir` (a
/// request-scoped scratch directory owned by the caller). Returns the
/// image paths in page order, verified dense: a gap in the page
/// numbering is an error, never a silent truncation point.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, RasterError>;
}

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("{0}")]
    Unavailable(String),
    #[error("recognition failed: {0}")]
    Recognition(String),
    #[error("recognition timed out after {secs}s")]
    TimedOut { secs: u64 },
}

/// Trait for OCR backends.
///
/// The session is acquired once per extraction run and released once at
/// the end (on drop), not per image — the engine may hold model state or
/// process-level resources that are expensive to re-acquire.
pub trait OcrEngine: Send + Sync {
    fn start_session(&self) -> Result<Box<dyn OcrSession + '_>, OcrError>;
}

pub trait OcrSession {
    /// Recognize text in a single page image.
    fn recognize(&mut self, image: &Path) -> Result<String, OcrError>;
}
