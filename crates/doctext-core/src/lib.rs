//! Document text extraction pipeline.
//!
//! Extracts plain text from PDF and DOC/DOCX files, transparently
//! falling back to rasterize-and-OCR when a PDF has no extractable text
//! layer (a scanned copy). The pipeline only orchestrates: the PDF
//! reader, the rasterization tool and the OCR engine are capabilities
//! behind traits ([`backend`]), supplied by the host — production
//! wiring uses the MuPDF reader from `doctext-pdf-mupdf` plus the
//! poppler/tesseract adapters here, tests use [`mock`].
//!
//! A request either fully succeeds or fails with a typed
//! [`ExtractError`]; there is no partial-result mode and no automatic
//! retry.

pub mod backend;
pub mod config_file;
pub mod detect;
pub mod document;
pub mod error;
pub mod format;
pub mod mock;
pub mod ocr;
pub mod office;
pub mod pipeline;
pub mod process;
pub mod raster;
pub mod tesseract;
pub mod textlayer;

pub use backend::{OcrEngine, OcrSession, PdfPages, PdfReader, Rasterizer};
pub use document::DocumentRef;
pub use error::ExtractError;
pub use format::{classify, DocumentFormat, ExtractionStrategy};
pub use pipeline::Extractor;
pub use raster::PdftoppmRasterizer;
pub use tesseract::TesseractOcr;
