//! Mock capability backends for testing.
//!
//! Deterministic stand-ins for the PDF reader, rasterizer and OCR
//! engine, so pipeline behavior is testable without real PDFs or the
//! poppler/tesseract binaries. Each mock counts its calls so tests can
//! assert short-circuiting and session scoping.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::{
    OcrEngine, OcrError, OcrSession, PdfPages, PdfReadError, PdfReader, RasterError, Rasterizer,
};

/// Scripted outcome for one page of a [`MockPdfReader`].
#[derive(Clone, Debug)]
pub enum PageOutcome {
    /// Page text (may be empty, which the detector treats as no text).
    Text(String),
    /// Structurally empty page (`Ok(None)` from the reader).
    Null,
    /// Page decode failure.
    Fail(String),
}

/// A [`PdfReader`] returning scripted per-page outcomes.
pub struct MockPdfReader {
    pages: Vec<PageOutcome>,
    open_error: Option<String>,
    opens: AtomicUsize,
    reads: Arc<AtomicUsize>,
}

impl MockPdfReader {
    pub fn with_pages(pages: Vec<PageOutcome>) -> Self {
        Self {
            pages,
            open_error: None,
            opens: AtomicUsize::new(0),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A reader whose every `open` fails.
    pub fn failing_open(reason: &str) -> Self {
        let mut mock = Self::with_pages(Vec::new());
        mock.open_error = Some(reason.to_string());
        mock
    }

    /// How many times `open()` has been called.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Total `text_of()` calls across all handles.
    pub fn pages_read(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl PdfReader for MockPdfReader {
    fn open(&self, _path: &Path) -> Result<Box<dyn PdfPages>, PdfReadError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.open_error {
            return Err(PdfReadError::Open(reason.clone()));
        }
        Ok(Box::new(MockPages {
            pages: self.pages.clone(),
            reads: Arc::clone(&self.reads),
        }))
    }
}

struct MockPages {
    pages: Vec<PageOutcome>,
    reads: Arc<AtomicUsize>,
}

impl PdfPages for MockPages {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn text_of(&mut self, page: u32) -> Result<Option<String>, PdfReadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match &self.pages[(page - 1) as usize] {
            PageOutcome::Text(text) => Ok(Some(text.clone())),
            PageOutcome::Null => Ok(None),
            PageOutcome::Fail(reason) => Err(PdfReadError::Extraction(reason.clone())),
        }
    }
}

/// A [`Rasterizer`] that writes placeholder page images into the scratch
/// directory, recording where it wrote them so tests can verify cleanup.
pub struct MockRasterizer {
    pages: usize,
    failure: Option<String>,
    calls: AtomicUsize,
    last_dir: Mutex<Option<PathBuf>>,
}

impl MockRasterizer {
    pub fn with_page_count(pages: usize) -> Self {
        Self {
            pages,
            failure: None,
            calls: AtomicUsize::new(0),
            last_dir: Mutex::new(None),
        }
    }

    pub fn failing(reason: &str) -> Self {
        let mut mock = Self::with_page_count(0);
        mock.failure = Some(reason.to_string());
        mock
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The scratch directory of the most recent run, if any.
    pub fn last_dir(&self) -> Option<PathBuf> {
        self.last_dir.lock().unwrap().clone()
    }
}

impl Rasterizer for MockRasterizer {
    fn rasterize(&self, _pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, RasterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_dir.lock().unwrap() = Some(dir.to_path_buf());

        if let Some(reason) = &self.failure {
            return Err(RasterError::ToolFailed {
                tool: "mock".to_string(),
                status: "exit status: 1".to_string(),
                stderr: reason.clone(),
            });
        }

        let mut images = Vec::with_capacity(self.pages);
        for page in 1..=self.pages {
            let path = dir.join(format!("page-{page}.png"));
            std::fs::write(&path, b"png")?;
            images.push(path);
        }
        Ok(images)
    }
}

/// An [`OcrEngine`] returning scripted per-image results in order, with
/// session and recognition call counting.
pub struct MockOcr {
    /// Reversed so each call can `pop()` the next response.
    responses: Mutex<Vec<Result<String, String>>>,
    unavailable: Option<String>,
    sessions: AtomicUsize,
    calls: AtomicUsize,
}

impl MockOcr {
    pub fn recognizing(mut responses: Vec<Result<String, String>>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            unavailable: None,
            sessions: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// An engine whose session acquisition always fails.
    pub fn unavailable(reason: &str) -> Self {
        let mut mock = Self::recognizing(Vec::new());
        mock.unavailable = Some(reason.to_string());
        mock
    }

    pub fn sessions_started(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn recognize_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for MockOcr {
    fn start_session(&self) -> Result<Box<dyn OcrSession + '_>, OcrError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.unavailable {
            return Err(OcrError::Unavailable(reason.clone()));
        }
        Ok(Box::new(MockOcrSession { engine: self }))
    }
}

struct MockOcrSession<'a> {
    engine: &'a MockOcr,
}

impl OcrSession for MockOcrSession<'_> {
    fn recognize(&mut self, _image: &Path) -> Result<String, OcrError> {
        self.engine.calls.fetch_add(1, Ordering::SeqCst);
        match self.engine.responses.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(OcrError::Recognition(reason)),
            None => Err(OcrError::Recognition("no scripted response left".into())),
        }
    }
}
