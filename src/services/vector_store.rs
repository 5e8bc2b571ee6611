//! Locally persisted vector index.
//!
//! The index is a flat list of embedded chunks serialized to a single JSON
//! file inside the index directory. Lifecycle is create-if-absent, else
//! load-and-append; `save` always rewrites the whole file. Search is an
//! exhaustive cosine-similarity scan.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::VectorStoreError;
use crate::models::{DocumentChunk, SearchHit};

/// File name probed to detect an existing index.
pub const INDEX_FILE_NAME: &str = "index.json";

const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    chunks: Vec<DocumentChunk>,
}

/// A vector index persisted in a directory on local disk.
#[derive(Debug)]
pub struct LocalVectorStore {
    dir: PathBuf,
    chunks: Vec<DocumentChunk>,
}

impl LocalVectorStore {
    pub fn index_file(dir: &Path) -> PathBuf {
        dir.join(INDEX_FILE_NAME)
    }

    /// Whether an index already exists at `dir`.
    pub fn exists(dir: &Path) -> bool {
        Self::index_file(dir).is_file()
    }

    /// Create a new, empty index rooted at `dir`. Nothing is written until
    /// `save` is called.
    pub fn create(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            chunks: Vec::new(),
        }
    }

    /// Load an existing index from `dir`.
    pub fn load(dir: &Path) -> Result<Self, VectorStoreError> {
        let path = Self::index_file(dir);
        let content = fs::read_to_string(&path)?;
        let persisted: PersistedIndex = serde_json::from_str(&content)?;

        if persisted.version != INDEX_FORMAT_VERSION {
            return Err(VectorStoreError::UnsupportedFormat(format!(
                "index version {} in {}",
                persisted.version,
                path.display()
            )));
        }

        info!(chunks = persisted.chunks.len(), path = %path.display(), "loaded vector index");
        Ok(Self {
            dir: dir.to_path_buf(),
            chunks: persisted.chunks,
        })
    }

    /// Load the index at `dir` if one exists, otherwise create an empty one.
    /// The boolean is true when an existing index was loaded.
    pub fn open_or_create(dir: &Path) -> Result<(Self, bool), VectorStoreError> {
        if Self::exists(dir) {
            Ok((Self::load(dir)?, true))
        } else {
            Ok((Self::create(dir), false))
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding dimension of the stored chunks, if any are present.
    pub fn dimension(&self) -> Option<usize> {
        self.chunks.first().map(|c| c.embedding.len())
    }

    /// Append embedded chunks to the index.
    ///
    /// Chunks must carry embeddings of a consistent dimension. There is no
    /// dedup: appending the same chunks twice doubles them.
    pub fn add_chunks(&mut self, chunks: Vec<DocumentChunk>) -> Result<(), VectorStoreError> {
        let mut expected = self.dimension();
        for chunk in &chunks {
            if chunk.embedding.is_empty() {
                return Err(VectorStoreError::InvalidChunk(format!(
                    "chunk {} has no embedding",
                    chunk.id
                )));
            }
            match expected {
                Some(dim) if chunk.embedding.len() != dim => {
                    return Err(VectorStoreError::DimensionMismatch {
                        expected: dim,
                        actual: chunk.embedding.len(),
                    });
                }
                None => expected = Some(chunk.embedding.len()),
                _ => {}
            }
        }
        self.chunks.extend(chunks);
        Ok(())
    }

    /// Persist the whole index, fully rewriting the index file.
    pub fn save(&self) -> Result<(), VectorStoreError> {
        fs::create_dir_all(&self.dir)?;
        let persisted = PersistedIndex {
            version: INDEX_FORMAT_VERSION,
            chunks: self.chunks.clone(),
        };
        let content = serde_json::to_string(&persisted)?;
        let path = Self::index_file(&self.dir);
        fs::write(&path, content)?;
        info!(chunks = self.chunks.len(), path = %path.display(), "vector index saved");
        Ok(())
    }

    /// Top-`limit` chunks by cosine similarity to `query`, descending.
    pub fn search(&self, query: &[f32], limit: usize, min_score: Option<f32>) -> Vec<SearchHit> {
        let mut scored: Vec<(f32, &DocumentChunk)> = self
            .chunks
            .iter()
            .filter(|c| c.embedding.len() == query.len())
            .map(|c| (cosine_similarity(query, &c.embedding), c))
            .filter(|(score, _)| min_score.is_none_or(|min| *score >= min))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(score, chunk)| SearchHit {
                score,
                content: chunk.content.clone(),
                source_file: chunk.source_file.clone(),
                source_path: chunk.source_path.clone(),
                page: chunk.page,
                chunk_index: chunk.chunk_index,
            })
            .collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn embedded_chunk(text: &str, embedding: Vec<f32>) -> DocumentChunk {
        let doc = Document::new(
            text.to_string(),
            "test.pdf".to_string(),
            "/docs/test.pdf".to_string(),
            1,
        );
        let mut chunk = DocumentChunk::from_document(&doc, text.to_string(), 0, 1, 0, 0);
        chunk.embedding = embedding;
        chunk
    }

    #[test]
    fn test_create_save_reload() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("vectorstore");
        assert!(!LocalVectorStore::exists(&index_dir));

        let mut store = LocalVectorStore::create(&index_dir);
        store
            .add_chunks(vec![embedded_chunk("one", vec![1.0, 0.0])])
            .unwrap();
        store.save().unwrap();

        assert!(LocalVectorStore::exists(&index_dir));
        let reloaded = LocalVectorStore::load(&index_dir).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.dimension(), Some(2));
    }

    #[test]
    fn test_open_or_create_appends_without_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("vectorstore");

        // First run: fresh index.
        let (mut store, existed) = LocalVectorStore::open_or_create(&index_dir).unwrap();
        assert!(!existed);
        let chunks = vec![
            embedded_chunk("alpha", vec![1.0, 0.0]),
            embedded_chunk("beta", vec![0.0, 1.0]),
        ];
        store.add_chunks(chunks.clone()).unwrap();
        store.save().unwrap();

        // Second run over the same content: union, duplicates included.
        let (mut store, existed) = LocalVectorStore::open_or_create(&index_dir).unwrap();
        assert!(existed);
        assert_eq!(store.len(), 2);
        store.add_chunks(chunks).unwrap();
        store.save().unwrap();

        let reloaded = LocalVectorStore::load(&index_dir).unwrap();
        assert_eq!(reloaded.len(), 4);
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalVectorStore::create(dir.path());
        store
            .add_chunks(vec![embedded_chunk("one", vec![1.0, 0.0, 0.0])])
            .unwrap();

        let err = store
            .add_chunks(vec![embedded_chunk("two", vec![1.0, 0.0])])
            .unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_rejects_unembedded_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalVectorStore::create(dir.path());
        let err = store
            .add_chunks(vec![embedded_chunk("one", Vec::new())])
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::InvalidChunk(_)));
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalVectorStore::create(dir.path());
        store
            .add_chunks(vec![
                embedded_chunk("east", vec![1.0, 0.0]),
                embedded_chunk("north", vec![0.0, 1.0]),
                embedded_chunk("northeast", vec![0.7, 0.7]),
            ])
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2, None);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "east");
        assert_eq!(hits[1].content, "northeast");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_search_min_score_filter() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalVectorStore::create(dir.path());
        store
            .add_chunks(vec![
                embedded_chunk("east", vec![1.0, 0.0]),
                embedded_chunk("north", vec![0.0, 1.0]),
            ])
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 10, Some(0.5));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "east");
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            LocalVectorStore::index_file(dir.path()),
            r#"{"version": 99, "chunks": []}"#,
        )
        .unwrap();
        let err = LocalVectorStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, VectorStoreError::UnsupportedFormat(_)));
    }
}
