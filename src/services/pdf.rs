//! Per-page PDF text extraction.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::PdfError;
use crate::models::Document;

/// Load a PDF and return one `Document` per page with extractable text.
///
/// Pages whose extracted text is pure whitespace are dropped. A file that
/// parses but yields no text at all is an error, so callers can treat it the
/// same as an unparseable file.
pub fn load_pdf_pages(path: &Path) -> Result<Vec<Document>, PdfError> {
    let source_path = path.to_string_lossy().to_string();
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| source_path.clone());

    let pdf = lopdf::Document::load(path).map_err(|e| PdfError::ParseError {
        file: source_file.clone(),
        message: e.to_string(),
    })?;

    let mut documents = Vec::new();
    for &page_number in pdf.get_pages().keys() {
        let text = match pdf.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %source_file, page = page_number, error = %e,
                    "failed to extract page text, skipping page");
                continue;
            }
        };

        let cleaned = clean_text(&text);
        if cleaned.is_empty() {
            debug!(file = %source_file, page = page_number, "page has no text, skipping");
            continue;
        }

        documents.push(Document::new(
            cleaned,
            source_file.clone(),
            source_path.clone(),
            page_number,
        ));
    }

    if documents.is_empty() {
        return Err(PdfError::EmptyDocument(source_file));
    }

    Ok(documents)
}

/// Normalize extracted text: strip control characters, trim line ends, and
/// collapse runs of blank lines into a single paragraph break.
fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    for line in text.lines() {
        let line: String = line
            .chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect();
        let trimmed = line.trim_end();

        if trimmed.is_empty() {
            blank_run += 1;
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(trimmed);
    }

    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_really.pdf");
        fs::write(&path, "this is not a pdf").unwrap();

        let err = load_pdf_pages(&path).unwrap_err();
        assert!(matches!(err, PdfError::ParseError { .. }));
    }

    #[test]
    fn test_load_minimal_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.pdf");
        testpdf::write_minimal_pdf(&path, "Hello from a test PDF");

        let docs = load_pdf_pages(&path).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page, 1);
        assert_eq!(docs[0].source_file, "hello.pdf");
        assert!(docs[0].content.contains("Hello from a test PDF"));
    }

    #[test]
    fn test_clean_text_collapses_blank_runs() {
        let cleaned = clean_text("first line  \n\n\n\nsecond line\n");
        assert_eq!(cleaned, "first line\n\nsecond line");
    }

    #[test]
    fn test_clean_text_strips_control_chars() {
        let cleaned = clean_text("abc\u{0000}def");
        assert_eq!(cleaned, "abcdef");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text("   \n \n"), "");
    }
}
