//! DOC/DOCX text extraction.
//!
//! A DOCX file is a ZIP container; the editable body lives in
//! `word/document.xml`. Text is collected by streaming the XML events:
//! `<w:t>` runs carry the text, `</w:p>` ends a paragraph, `<w:tab/>`
//! and `<w:br/>` are literal tab/line breaks. Ordering is whatever the
//! container defines as document order — no page concept applies.
//!
//! Legacy binary `.doc` (OLE2) is not a ZIP container and fails at open
//! with a descriptive error.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract the full plain-text body of a DOC/DOCX container.
pub fn extract_office_text(path: &Path) -> Result<String, ExtractError> {
    let file = std::fs::File::open(path).map_err(|e| ExtractError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        ExtractError::OfficeParse(format!(
            "not a DOCX container (legacy .doc is not supported): {e}"
        ))
    })?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::OfficeParse(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::OfficeParse(format!("failed to read {DOCUMENT_PART}: {e}")))?;

    document_body_text(&xml)
}

/// Walk the WordprocessingML event stream and collect body text.
fn document_body_text(xml: &str) -> Result<String, ExtractError> {
    // Whitespace inside <w:t> runs is significant; text trimming stays off.
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_run_text = true;
                }
            }
            Ok(Event::Text(ref t)) if in_run_text => {
                let piece = t
                    .unescape()
                    .map_err(|e| ExtractError::OfficeParse(e.to_string()))?;
                text.push_str(&piece);
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ExtractError::OfficeParse(e.to_string())),
        }
    }

    Ok(text)
}
