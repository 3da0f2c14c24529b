use std::path::PathBuf;

use crate::backend::OcrEngine;
use crate::error::ExtractError;

/// Run OCR over a page-ordered image set and aggregate the recognized
/// text, one newline-terminated chunk per page.
///
/// The engine session is acquired once for the whole run and released
/// when it drops, not per image. Any recognition failure aborts the run
/// with the 1-based page number; a document either fully succeeds or the
/// call fails outright.
pub fn run_ocr(engine: &dyn OcrEngine, images: &[PathBuf]) -> Result<String, ExtractError> {
    let mut session = engine
        .start_session()
        .map_err(|e| ExtractError::OcrUnavailable(e.to_string()))?;

    let mut text = String::new();
    for (idx, image) in images.iter().enumerate() {
        let page = idx as u32 + 1;
        let recognized = session
            .recognize(image)
            .map_err(|e| ExtractError::ocr(page, e))?;
        text.push_str(&recognized);
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockOcr;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn aggregates_pages_in_order_newline_terminated() {
        let engine = MockOcr::recognizing(vec![
            Ok("t1".into()),
            Ok("t2".into()),
            Ok("t3".into()),
            Ok("t4".into()),
            Ok("t5".into()),
        ]);
        let images = paths(&["p1.png", "p2.png", "p3.png", "p4.png", "p5.png"]);
        let text = run_ocr(&engine, &images).unwrap();
        assert_eq!(text, "t1\nt2\nt3\nt4\nt5\n");
    }

    #[test]
    fn session_is_acquired_exactly_once() {
        let engine = MockOcr::recognizing(vec![Ok("a".into()), Ok("b".into()), Ok("c".into())]);
        let images = paths(&["1.png", "2.png", "3.png"]);
        run_ocr(&engine, &images).unwrap();
        assert_eq!(engine.sessions_started(), 1);
        assert_eq!(engine.recognize_calls(), 3);
    }

    #[test]
    fn recognition_failure_aborts_with_page_number() {
        let engine = MockOcr::recognizing(vec![
            Ok("fine".into()),
            Err("blurry image".into()),
            Ok("never reached".into()),
        ]);
        let images = paths(&["1.png", "2.png", "3.png"]);
        let err = run_ocr(&engine, &images).unwrap_err();
        match err {
            ExtractError::Ocr { page, reason } => {
                assert_eq!(page, 2);
                assert!(reason.contains("blurry image"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(engine.recognize_calls(), 2);
    }

    #[test]
    fn session_failure_is_ocr_unavailable() {
        let engine = MockOcr::unavailable("tesseract not installed");
        let err = run_ocr(&engine, &paths(&["1.png"])).unwrap_err();
        assert!(matches!(err, ExtractError::OcrUnavailable(_)));
        assert!(err.to_string().contains("tesseract not installed"));
    }

    #[test]
    fn empty_image_set_yields_empty_text() {
        let engine = MockOcr::recognizing(vec![]);
        assert_eq!(run_ocr(&engine, &[]).unwrap(), "");
    }
}
