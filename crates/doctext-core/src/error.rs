use thiserror::Error;

use crate::backend::{OcrError, PdfReadError, RasterError};

/// Pipeline-level error taxonomy. Every stage fails fast; the message is
/// meant to be surfaced to the caller verbatim, so each variant carries
/// enough context (stage, page number, path) to be useful on its own.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Extension not recognized. User-correctable: re-upload in a
    /// supported format.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The underlying reader could not open the file at all.
    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    /// A specific page's content stream could not be decoded. Aborts the
    /// whole request; no partial results.
    #[error("failed to extract text from page {page}: {reason}")]
    Page { page: u32, reason: String },

    /// The external rasterization tool failed or is missing.
    #[error("failed to convert PDF to images: {0}")]
    Rasterization(String),

    /// Recognition failed for a specific page image.
    #[error("OCR failed on page {page}: {reason}")]
    Ocr { page: u32, reason: String },

    /// The OCR session could not be acquired (engine missing or broken).
    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    /// The DOC/DOCX container could not be opened or parsed.
    #[error("failed to read office document: {0}")]
    OfficeParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RasterError> for ExtractError {
    fn from(e: RasterError) -> Self {
        ExtractError::Rasterization(e.to_string())
    }
}

impl ExtractError {
    pub(crate) fn open(path: &std::path::Path, e: PdfReadError) -> Self {
        ExtractError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn page(page: u32, e: PdfReadError) -> Self {
        ExtractError::Page {
            page,
            reason: e.to_string(),
        }
    }

    pub(crate) fn ocr(page: u32, e: OcrError) -> Self {
        ExtractError::Ocr {
            page,
            reason: e.to_string(),
        }
    }
}
