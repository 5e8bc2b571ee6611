mod config;
mod document;
mod search;

pub use config::{
    Config, Credentials, DEFAULT_DOCS_DIR, DEFAULT_EMBEDDING_MODEL, DEFAULT_INDEX_DIR,
    EmbeddingConfig, IngestionConfig, ProviderSettings, ProvidersConfig,
};
pub use document::{Document, DocumentChunk};
pub use search::{OutputFormat, SearchHit, SearchResults};
