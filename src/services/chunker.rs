//! Text chunking with character overlap.

use crate::models::{Document, DocumentChunk, IngestionConfig};

/// Splits page documents into overlapping character-budget chunks.
///
/// Splitting is deterministic and length-based; the only concession to
/// structure is a preference for paragraph, sentence, or word boundaries
/// near the end of each budget.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Chunk budget in characters.
    chunk_size: usize,
    /// Overlap with the previous chunk, in characters. An overlap that is
    /// not smaller than the chunk size is treated as no overlap.
    overlap: usize,
}

impl TextChunker {
    pub fn new(config: &IngestionConfig) -> Self {
        let chunk_size = (config.chunk_size as usize).max(1);
        let overlap = config.chunk_overlap as usize;
        Self {
            chunk_size,
            overlap: if overlap >= chunk_size { 0 } else { overlap },
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&IngestionConfig::default())
    }

    /// Chunk a document into overlapping segments.
    pub fn chunk(&self, document: &Document) -> Vec<DocumentChunk> {
        let content = &document.content;

        if content.is_empty() {
            return Vec::new();
        }

        if content.chars().count() <= self.chunk_size {
            return vec![DocumentChunk::from_document(
                document,
                content.clone(),
                0,
                1,
                0,
                content.chars().count() as u64,
            )];
        }

        let pieces = self.split_with_overlap(content);
        let total_chunks = pieces.len() as u32;

        pieces
            .into_iter()
            .enumerate()
            .map(|(idx, (chunk_content, start_offset, end_offset))| {
                DocumentChunk::from_document(
                    document,
                    chunk_content,
                    idx as u32,
                    total_chunks,
                    start_offset,
                    end_offset,
                )
            })
            .collect()
    }

    /// Split content into overlapping pieces with char-offset positions.
    fn split_with_overlap(&self, content: &str) -> Vec<(String, u64, u64)> {
        let chars: Vec<char> = content.chars().collect();
        let total_chars = chars.len();
        let mut pieces = Vec::new();

        let mut start = 0;
        while start < total_chars {
            let end = (start + self.chunk_size).min(total_chars);
            let adjusted_end = self.find_break_point(&chars, end, total_chars);

            let chunk_content: String = chars[start..adjusted_end].iter().collect();
            if !chunk_content.trim().is_empty() {
                pieces.push((chunk_content, start as u64, adjusted_end as u64));
            }

            if adjusted_end >= total_chars {
                break;
            }
            // The next window resumes `overlap` characters before the break
            // point, so an early break never leaves uncovered text. Always
            // move forward to guarantee termination.
            start = adjusted_end.saturating_sub(self.overlap).max(start + 1);
        }

        pieces
    }

    /// Find a natural break point near the target end position.
    fn find_break_point(&self, chars: &[char], target_end: usize, total: usize) -> usize {
        if target_end >= total {
            return total;
        }

        // Search within the last 20% of the budget.
        let search_start = target_end.saturating_sub(self.chunk_size / 5);
        let search_range = &chars[search_start..target_end];

        // Priority: paragraph break > newline > sentence end > space
        let mut paragraph = None;
        let mut last_newline = None;
        let mut last_sentence = None;
        let mut last_space = None;

        for (i, c) in search_range.iter().enumerate() {
            let pos = search_start + i;
            match c {
                '\n' => {
                    if i > 0 && search_range.get(i - 1) == Some(&'\n') {
                        paragraph = Some(pos + 1);
                    }
                    last_newline = Some(pos + 1);
                }
                '.' | '!' | '?' => {
                    if search_range.get(i + 1).is_some_and(|c| c.is_whitespace()) {
                        last_sentence = Some(pos + 1);
                    }
                }
                ' ' | '\t' => {
                    last_space = Some(pos + 1);
                }
                _ => {}
            }
        }

        paragraph
            .or(last_newline)
            .or(last_sentence)
            .or(last_space)
            .unwrap_or(target_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document(content: &str) -> Document {
        Document::new(
            content.to_string(),
            "test.pdf".to_string(),
            "/docs/test.pdf".to_string(),
            1,
        )
    }

    fn config(size: u32, overlap: u32) -> IngestionConfig {
        IngestionConfig {
            chunk_size: size,
            chunk_overlap: overlap,
            ..Default::default()
        }
    }

    #[test]
    fn test_small_document_single_chunk() {
        let chunker = TextChunker::with_defaults();
        let doc = test_document("Hello, world!");
        let chunks = chunker.chunk(&doc);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Hello, world!");
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].total_chunks, 1);
    }

    #[test]
    fn test_empty_document() {
        let chunker = TextChunker::with_defaults();
        let doc = test_document("");
        assert!(chunker.chunk(&doc).is_empty());
    }

    #[test]
    fn test_chunk_count_bounds() {
        // With size 800 and overlap 200 each window advances at least
        // 800 - 800/5 - 200 = 440 characters, so a document of n characters
        // yields at most ceil(n / 440) + 1 chunks.
        let chunker = TextChunker::new(&config(800, 200));
        let content = "word ".repeat(1000); // 5000 chars
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        assert!(!chunks.is_empty());
        assert!(chunks.len() <= 5000_usize.div_ceil(440) + 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 800);
            assert_eq!(chunk.source_file, "test.pdf");
        }
    }

    #[test]
    fn test_chunk_indices_sequential() {
        let chunker = TextChunker::new(&config(50, 10));
        let content = "a".repeat(500);
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert_eq!(chunk.total_chunks, chunks.len() as u32);
        }
    }

    #[test]
    fn test_neighbors_overlap() {
        let chunker = TextChunker::new(&config(100, 40));
        let content = "x".repeat(1000); // no break points, raw budget cuts
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        for pair in chunks.windows(2) {
            // No break points, so each window advances size - overlap.
            assert_eq!(pair[1].start_offset - pair[0].start_offset, 60);
            assert!(pair[1].start_offset < pair[0].end_offset);
        }
    }

    #[test]
    fn test_overlap_larger_than_size_still_advances() {
        let chunker = TextChunker::new(&config(10, 20));
        let content = "b".repeat(100);
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        assert!(!chunks.is_empty());
        // Degenerate overlap is treated as none, so the split terminates.
        assert!(chunks.len() <= 10);
    }

    #[test]
    fn test_every_character_lands_in_some_chunk() {
        // A lone space late in the first window pulls the break point back;
        // the next chunk must resume where the previous one ended, even with
        // no overlap to paper over the gap.
        let chunker = TextChunker::new(&config(100, 0));
        let mut content = "y".repeat(300);
        content.replace_range(85..86, " ");
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        let mut covered = 0u64;
        for chunk in &chunks {
            assert!(chunk.start_offset <= covered, "gap before {}", chunk.start_offset);
            covered = covered.max(chunk.end_offset);
        }
        assert_eq!(covered, 300);
    }

    #[test]
    fn test_small_overlap_covers_all_text() {
        let chunker = TextChunker::new(&config(120, 10));
        let content = "alpha beta gamma delta. ".repeat(40); // 960 chars
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        let mut covered = 0u64;
        for chunk in &chunks {
            assert!(chunk.start_offset <= covered);
            covered = covered.max(chunk.end_offset);
        }
        assert_eq!(covered, 960);
    }

    #[test]
    fn test_prefers_sentence_boundary() {
        let chunker = TextChunker::new(&config(60, 10));
        let content = "This is the first sentence. This is the second sentence that keeps going on.";
        let doc = test_document(content);
        let chunks = chunker.chunk(&doc);

        assert!(chunks.len() > 1);
        assert!(chunks[0].content.trim_end().ends_with(|c| c == '.' || c == ' ') ||
            chunks[0].content.contains("first sentence."));
    }
}
