use crate::document::DocumentRef;
use crate::error::ExtractError;

/// Supported document families, decided from the declared extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Office,
}

/// How a document will be extracted. Selected once per document and
/// never re-evaluated mid-pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Read the PDF's embedded text layer directly.
    DirectText,
    /// Rasterize each page and run OCR (scanned PDFs).
    RasterizeAndOcr,
    /// Read the DOC/DOCX container body.
    OfficeContainer,
}

/// Classify a document by its declared extension, case-insensitively.
///
/// Pure decision step: no content sniffing, no filesystem access. An
/// unrecognized (or absent) extension fails fast with the offending
/// extension in the error message.
pub fn classify(doc: &DocumentRef) -> Result<DocumentFormat, ExtractError> {
    match doc.extension() {
        ".pdf" => Ok(DocumentFormat::Pdf),
        ".doc" | ".docx" => Ok(DocumentFormat::Office),
        other => Err(ExtractError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_and_office_extensions_dispatch() {
        assert_eq!(
            classify(&DocumentRef::new("/tmp/a.pdf")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            classify(&DocumentRef::new("/tmp/a.doc")).unwrap(),
            DocumentFormat::Office
        );
        assert_eq!(
            classify(&DocumentRef::new("/tmp/a.docx")).unwrap(),
            DocumentFormat::Office
        );
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(
            classify(&DocumentRef::new("/tmp/REPORT.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            classify(&DocumentRef::new("/tmp/memo.DocX")).unwrap(),
            DocumentFormat::Office
        );
    }

    #[test]
    fn unsupported_extension_is_named_in_error() {
        let err = classify(&DocumentRef::new("/tmp/notes.txt")).unwrap_err();
        match &err {
            ExtractError::UnsupportedFormat(ext) => assert_eq!(ext, ".txt"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn missing_extension_is_unsupported() {
        assert!(matches!(
            classify(&DocumentRef::new("/tmp/upload")),
            Err(ExtractError::UnsupportedFormat(ext)) if ext.is_empty()
        ));
    }
}
