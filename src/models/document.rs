use serde::{Deserialize, Serialize};

/// One page of a source PDF, the unit produced by the loader and consumed
/// by the splitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    /// File name of the originating PDF (no directory components).
    pub source_file: String,
    /// Full path of the originating PDF as given to the loader.
    pub source_path: String,
    /// 1-based page number within the PDF.
    pub page: u32,
    pub checksum: String,
    pub created_at: String,
}

impl Document {
    pub fn generate_id(source_path: &str, page: u32) -> String {
        use sha2::{Digest, Sha256};
        let input = format!("{}:{}", source_path, page);
        let hash = Sha256::digest(input.as_bytes());
        hex::encode(&hash[..16])
    }

    pub fn new(content: String, source_file: String, source_path: String, page: u32) -> Self {
        let id = Self::generate_id(&source_path, page);
        let checksum = crate::utils::calculate_checksum(&content);
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            content,
            source_file,
            source_path,
            page,
            checksum,
            created_at: now,
        }
    }
}

/// A bounded-length fragment of a document, the atomic unit embedded into
/// the vector index. Inherits its parent's source metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub document_id: String,
    pub content: String,
    pub chunk_index: u32,
    pub total_chunks: u32,
    pub start_offset: u64,
    pub end_offset: u64,
    pub source_file: String,
    pub source_path: String,
    pub page: u32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    pub created_at: String,
}

impl DocumentChunk {
    pub fn generate_id(document_id: &str, chunk_index: u32) -> String {
        use uuid::Uuid;
        let name = format!("{}:{}", document_id, chunk_index);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    pub fn from_document(
        document: &Document,
        content: String,
        chunk_index: u32,
        total_chunks: u32,
        start_offset: u64,
        end_offset: u64,
    ) -> Self {
        let id = Self::generate_id(&document.id, chunk_index);
        Self {
            id,
            document_id: document.id.clone(),
            content,
            chunk_index,
            total_chunks,
            start_offset,
            end_offset,
            source_file: document.source_file.clone(),
            source_path: document.source_path.clone(),
            page: document.page,
            embedding: Vec::new(),
            created_at: document.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_generate_id() {
        let id1 = Document::generate_id("/docs/wellness.pdf", 1);
        let id2 = Document::generate_id("/docs/wellness.pdf", 1);
        let id3 = Document::generate_id("/docs/wellness.pdf", 2);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1.len(), 32);
    }

    #[test]
    fn test_document_new_carries_source_metadata() {
        let doc = Document::new(
            "page text".to_string(),
            "wellness.pdf".to_string(),
            "/docs/wellness.pdf".to_string(),
            3,
        );
        assert_eq!(doc.source_file, "wellness.pdf");
        assert_eq!(doc.source_path, "/docs/wellness.pdf");
        assert_eq!(doc.page, 3);
        assert!(!doc.checksum.is_empty());
    }

    #[test]
    fn test_chunk_id_deterministic() {
        let a = DocumentChunk::generate_id("doc1", 0);
        let b = DocumentChunk::generate_id("doc1", 0);
        let c = DocumentChunk::generate_id("doc1", 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_chunk_inherits_metadata() {
        let doc = Document::new(
            "content".to_string(),
            "a.pdf".to_string(),
            "/docs/a.pdf".to_string(),
            2,
        );
        let chunk = DocumentChunk::from_document(&doc, "con".to_string(), 0, 1, 0, 3);

        assert_eq!(chunk.document_id, doc.id);
        assert_eq!(chunk.source_file, "a.pdf");
        assert_eq!(chunk.page, 2);
        assert!(chunk.embedding.is_empty());
    }
}
