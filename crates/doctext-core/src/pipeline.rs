use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use crate::backend::{OcrEngine, PdfReader, Rasterizer};
use crate::detect::is_scanned_pdf;
use crate::document::DocumentRef;
use crate::error::ExtractError;
use crate::format::{classify, DocumentFormat, ExtractionStrategy};
use crate::ocr::run_ocr;
use crate::office::extract_office_text;
use crate::textlayer::extract_text_layer;

/// One extraction request, modeled as an explicit state machine.
///
/// The scratch directory for rasterized page images travels inside the
/// `RecognizePages` variant, so it is dropped (and the images deleted)
/// on every exit path, error or not.
#[derive(Debug)]
enum Stage {
    Classify,
    DetectScanned,
    ExtractTextLayer,
    Rasterize,
    RecognizePages {
        scratch: TempDir,
        images: Vec<PathBuf>,
    },
    ExtractOffice,
    Done(String),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Classify => "classify",
            Stage::DetectScanned => "detect_scanned",
            Stage::ExtractTextLayer => "extract_text_layer",
            Stage::Rasterize => "rasterize",
            Stage::RecognizePages { .. } => "recognize_pages",
            Stage::ExtractOffice => "extract_office",
            Stage::Done(_) => "done",
        }
    }
}

/// The extraction pipeline entry point.
///
/// Dispatches a [`DocumentRef`] to the text-layer, OCR or office path
/// based on classification, and owns the lifecycle of every temporary
/// resource created along the way. Capabilities are injected as trait
/// objects; production wiring uses `MupdfReader`, [`PdftoppmRasterizer`]
/// and [`TesseractOcr`], tests use the mocks in [`crate::mock`].
///
/// [`PdftoppmRasterizer`]: crate::raster::PdftoppmRasterizer
/// [`TesseractOcr`]: crate::tesseract::TesseractOcr
pub struct Extractor {
    pdf: Arc<dyn PdfReader>,
    rasterizer: Arc<dyn Rasterizer>,
    ocr: Arc<dyn OcrEngine>,
}

impl Extractor {
    pub fn new(
        pdf: Arc<dyn PdfReader>,
        rasterizer: Arc<dyn Rasterizer>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            pdf,
            rasterizer,
            ocr,
        }
    }

    /// Extract the plain text of `doc`.
    ///
    /// Runs the request state machine to `Done` or the first failing
    /// stage. No retries anywhere: a failed stage is a failed request,
    /// and no partial result is ever returned.
    pub fn extract(&self, doc: &DocumentRef) -> Result<String, ExtractError> {
        let mut stage = Stage::Classify;
        loop {
            tracing::debug!(path = %doc.path().display(), stage = stage.name(), "pipeline stage");
            match self.advance(stage, doc)? {
                Stage::Done(text) => {
                    tracing::info!(path = %doc.path().display(), chars = text.len(), "extraction complete");
                    return Ok(text);
                }
                next => stage = next,
            }
        }
    }

    /// Run exactly one state transition.
    fn advance(&self, stage: Stage, doc: &DocumentRef) -> Result<Stage, ExtractError> {
        Ok(match stage {
            Stage::Classify => match classify(doc)? {
                DocumentFormat::Pdf => Stage::DetectScanned,
                DocumentFormat::Office => {
                    let strategy = ExtractionStrategy::OfficeContainer;
                    tracing::debug!(path = %doc.path().display(), strategy = ?strategy, "strategy selected");
                    Stage::ExtractOffice
                }
            },

            Stage::DetectScanned => {
                let strategy = if is_scanned_pdf(self.pdf.as_ref(), doc.path()) {
                    ExtractionStrategy::RasterizeAndOcr
                } else {
                    ExtractionStrategy::DirectText
                };
                tracing::debug!(path = %doc.path().display(), strategy = ?strategy, "strategy selected");
                if strategy == ExtractionStrategy::RasterizeAndOcr {
                    Stage::Rasterize
                } else {
                    Stage::ExtractTextLayer
                }
            }

            // No OCR fallback if the text layer fails after the document
            // was classified as non-scanned; the error propagates as-is.
            Stage::ExtractTextLayer => {
                Stage::Done(extract_text_layer(self.pdf.as_ref(), doc.path())?)
            }

            Stage::Rasterize => {
                let scratch = TempDir::new()?;
                let images = self.rasterizer.rasterize(doc.path(), scratch.path())?;
                Stage::RecognizePages { scratch, images }
            }

            Stage::RecognizePages { scratch, images } => {
                let text = run_ocr(self.ocr.as_ref(), &images)?;
                drop(scratch);
                Stage::Done(text)
            }

            Stage::ExtractOffice => Stage::Done(extract_office_text(doc.path())?),

            Stage::Done(text) => Stage::Done(text),
        })
    }
}
