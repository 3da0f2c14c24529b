use std::path::Path;

use mupdf::{Document, TextPageFlags};

use doctext_core::backend::{PdfPages, PdfReadError, PdfReader};

/// MuPDF-based implementation of [`PdfReader`].
///
/// This crate is the sole AGPL island — it isolates the mupdf dependency
/// (which is AGPL-3.0) so that non-PDF code paths do not transitively
/// depend on it.
#[derive(Default)]
pub struct MupdfReader;

impl MupdfReader {
    pub fn new() -> Self {
        Self
    }
}

impl PdfReader for MupdfReader {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfPages>, PdfReadError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| PdfReadError::Open("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| PdfReadError::Open(e.to_string()))?;
        let page_count = document
            .page_count()
            .map_err(|e| PdfReadError::Open(e.to_string()))?;
        if page_count < 0 {
            return Err(PdfReadError::Open("negative page count".into()));
        }

        Ok(Box::new(MupdfPages {
            document,
            page_count: page_count as u32,
        }))
    }
}

struct MupdfPages {
    document: Document,
    page_count: u32,
}

impl PdfPages for MupdfPages {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    // MuPDF has no notion of a structurally null page, so this never
    // returns `Ok(None)`; a page with no text blocks yields an empty
    // string, which the scanned detector treats the same way.
    fn text_of(&mut self, page: u32) -> Result<Option<String>, PdfReadError> {
        let page = self
            .document
            .load_page(page as i32 - 1)
            .map_err(|e| PdfReadError::Extraction(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| PdfReadError::Extraction(e.to_string()))?;

        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }
        Ok(Some(page_text))
    }
}
