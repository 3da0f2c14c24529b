use std::path::Path;

use crate::backend::PdfReader;
use crate::error::ExtractError;

/// Extract the embedded text layer of a PDF, page by page.
///
/// Pages the reader marks as structurally empty are skipped. A page
/// whose content cannot be decoded aborts the whole extraction with a
/// page-scoped error — no partial results. Concatenation preserves
/// physical page order.
pub fn extract_text_layer(reader: &dyn PdfReader, path: &Path) -> Result<String, ExtractError> {
    let mut pages = reader
        .open(path)
        .map_err(|e| ExtractError::open(path, e))?;

    let mut text = String::new();
    for page in 1..=pages.page_count() {
        match pages.text_of(page) {
            Ok(Some(page_text)) => text.push_str(&page_text),
            Ok(None) => continue,
            Err(e) => return Err(ExtractError::page(page, e)),
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPdfReader, PageOutcome};

    #[test]
    fn concatenates_pages_in_physical_order() {
        let reader = MockPdfReader::with_pages(vec![
            PageOutcome::Text("p1".into()),
            PageOutcome::Text("p2".into()),
            PageOutcome::Text("p3".into()),
        ]);
        let text = extract_text_layer(&reader, Path::new("/tmp/doc.pdf")).unwrap();
        assert_eq!(text, "p1p2p3");
    }

    #[test]
    fn null_pages_are_skipped_without_error() {
        let reader = MockPdfReader::with_pages(vec![
            PageOutcome::Text("a".into()),
            PageOutcome::Null,
            PageOutcome::Text("b".into()),
        ]);
        let text = extract_text_layer(&reader, Path::new("/tmp/doc.pdf")).unwrap();
        assert_eq!(text, "ab");
    }

    #[test]
    fn page_decode_failure_aborts_with_page_number() {
        let reader = MockPdfReader::with_pages(vec![
            PageOutcome::Text("a".into()),
            PageOutcome::Fail("bad content stream".into()),
            PageOutcome::Text("c".into()),
        ]);
        let err = extract_text_layer(&reader, Path::new("/tmp/doc.pdf")).unwrap_err();
        match err {
            ExtractError::Page { page, .. } => assert_eq!(page, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn open_failure_is_reported_with_path() {
        let reader = MockPdfReader::failing_open("corrupt xref");
        let err = extract_text_layer(&reader, Path::new("/tmp/doc.pdf")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/tmp/doc.pdf"));
        assert!(msg.contains("corrupt xref"));
    }
}
