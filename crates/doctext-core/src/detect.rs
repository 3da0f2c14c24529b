use std::path::Path;

use crate::backend::PdfReader;

/// Heuristically decide whether a PDF is a scanned copy (image-only,
/// no usable text layer).
///
/// Scans pages in order and stops at the first page yielding non-empty
/// text (not scanned). Pages that error out are skipped, like empty
/// ones. Only when every page comes back empty is the document
/// classified as scanned.
///
/// The heuristic is deliberately conservative: a false positive merely
/// sends a text-bearing PDF through OCR (slower, still correct), while
/// the alternative would be never detecting genuinely scanned
/// documents. An error opening the document classifies as NOT scanned —
/// the subsequent direct extraction will fail with a more informative
/// message.
pub fn is_scanned_pdf(reader: &dyn PdfReader, path: &Path) -> bool {
    let mut pages = match reader.open(path) {
        Ok(pages) => pages,
        Err(_) => return false,
    };

    for page in 1..=pages.page_count() {
        match pages.text_of(page) {
            Ok(Some(text)) if !text.is_empty() => return false,
            _ => continue,
        }
    }
    true
}
