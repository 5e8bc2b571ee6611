//! Ingestion pipeline steps: discovery, loading, chunking.
//!
//! The CLI drives these in sequence; each step returns a typed result so the
//! entry point decides exit behavior.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{IngestError, PdfError};
use crate::models::{Document, DocumentChunk, IngestionConfig};
use crate::services::chunker::TextChunker;
use crate::services::pdf::load_pdf_pages;

/// A PDF that failed to load and was skipped.
#[derive(Debug)]
pub struct SkippedPdf {
    pub path: PathBuf,
    pub reason: PdfError,
}

/// List PDF files directly inside `dir`, sorted by name.
///
/// Non-recursive; matching is by case-insensitive `.pdf` extension.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound(
            dir.to_string_lossy().to_string(),
        ));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(IngestError::NoPdfsFound(dir.to_string_lossy().to_string()));
    }

    info!(count = files.len(), dir = %dir.display(), "found PDF files for ingestion");
    Ok(files)
}

/// Load every file into page documents, skipping files that fail to parse.
///
/// Partial-failure tolerant at file granularity: a bad file is logged and
/// skipped. If nothing loads at all, the whole step fails.
pub fn load_documents(
    files: &[PathBuf],
) -> Result<(Vec<Document>, Vec<SkippedPdf>), IngestError> {
    let mut documents = Vec::new();
    let mut skipped = Vec::new();

    for path in files {
        match load_pdf_pages(path) {
            Ok(pages) => {
                info!(file = %path.display(), pages = pages.len(), "PDF loaded");
                documents.extend(pages);
            }
            Err(reason) => {
                warn!(file = %path.display(), error = %reason, "failed to load PDF, skipping");
                skipped.push(SkippedPdf {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    if documents.is_empty() {
        return Err(IngestError::NoDocumentsLoaded);
    }

    Ok((documents, skipped))
}

/// Split all page documents into overlapping chunks.
pub fn chunk_documents(documents: &[Document], config: &IngestionConfig) -> Vec<DocumentChunk> {
    let chunker = TextChunker::new(config);
    let chunks: Vec<DocumentChunk> = documents.iter().flat_map(|doc| chunker.chunk(doc)).collect();
    info!(
        documents = documents.len(),
        chunks = chunks.len(),
        chunk_size = config.chunk_size,
        chunk_overlap = config.chunk_overlap,
        "documents split into chunks"
    );
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pdf::testpdf::write_minimal_pdf;
    use std::fs;

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = discover_pdfs(&missing).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a pdf").unwrap();
        let err = discover_pdfs(dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::NoPdfsFound(_)));
    }

    #[test]
    fn test_discover_sorted_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal_pdf(&dir.path().join("b.PDF"), "b");
        write_minimal_pdf(&dir.path().join("a.pdf"), "a");
        fs::create_dir(dir.path().join("sub.pdf")).unwrap(); // directories never match
        fs::write(dir.path().join("c.txt"), "ignored").unwrap();

        let files = discover_pdfs(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }

    #[test]
    fn test_load_skips_bad_file_keeps_good() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdf");
        let bad = dir.path().join("bad.pdf");
        write_minimal_pdf(&good, "Readable content here");
        fs::write(&bad, "garbage bytes").unwrap();

        let (documents, skipped) = load_documents(&[bad.clone(), good]).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].source_file, "good.pdf");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, bad);
    }

    #[test]
    fn test_load_fails_when_nothing_loads() {
        let dir = tempfile::tempdir().unwrap();
        let bad1 = dir.path().join("one.pdf");
        let bad2 = dir.path().join("two.pdf");
        fs::write(&bad1, "junk").unwrap();
        fs::write(&bad2, "junk").unwrap();

        let err = load_documents(&[bad1, bad2]).unwrap_err();
        assert!(matches!(err, IngestError::NoDocumentsLoaded));
    }

    #[test]
    fn test_chunk_documents_carries_source_metadata() {
        let documents = vec![
            Document::new(
                "alpha ".repeat(300),
                "a.pdf".to_string(),
                "/docs/a.pdf".to_string(),
                1,
            ),
            Document::new(
                "beta".to_string(),
                "b.pdf".to_string(),
                "/docs/b.pdf".to_string(),
                1,
            ),
        ];
        let chunks = chunk_documents(&documents, &IngestionConfig::default());

        assert!(chunks.len() >= 2);
        assert!(chunks.iter().any(|c| c.source_file == "a.pdf"));
        assert!(chunks.iter().any(|c| c.source_file == "b.pdf"));
    }
}
