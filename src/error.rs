//! Error types for the RAG ingestion CLI.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors related to configuration and credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error(
        "no provider credentials configured; set at least one of \
         GOOGLE_API_KEY (or GEMINI_API_KEY), OPENAI_API_KEY, GROQ_API_KEY"
    )]
    NoCredentials,

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("missing provider configuration: {0}")]
    MissingProviderConfig(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Errors related to embedding and LLM client construction and invocation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to construct {provider} client: {message}")]
    Construction { provider: String, message: String },

    #[error("could not load any LLM provider; last error: {last_error}")]
    AllProvidersFailed { last_error: String },

    #[error("no LLM providers configured")]
    NoProvidersConfigured,

    #[error("model request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Errors related to embedding API calls.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding API: {0}")]
    ConnectionError(String),

    #[error("embedding API error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding timeout")]
    Timeout,
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            // Connection and timeout errors are retryable
            EmbeddingError::ConnectionError(_) | EmbeddingError::Timeout => true,
            // Server errors might be transient (e.g., 503 Service Unavailable)
            EmbeddingError::ServerError(msg) => {
                msg.contains("503")
                    || msg.contains("502")
                    || msg.contains("504")
                    || msg.contains("429")
                    || msg.to_lowercase().contains("unavailable")
                    || msg.to_lowercase().contains("too many requests")
            }
            // Request errors depend on the underlying cause
            EmbeddingError::RequestError(e) => e.is_timeout() || e.is_connect(),
            // Invalid responses are not retryable
            EmbeddingError::InvalidResponse(_) => false,
        }
    }
}

/// Errors related to PDF parsing.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("PDF parse error in {file}: {message}")]
    ParseError { file: String, message: String },

    #[error("no extractable text in {0}")]
    EmptyDocument(String),
}

/// Errors related to the local vector index.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("index serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("embedding dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid chunk: {0}")]
    InvalidChunk(String),

    #[error("unsupported index format: {0}")]
    UnsupportedFormat(String),
}

/// Errors related to the ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("no PDF files found in {0}")]
    NoPdfsFound(String),

    #[error("no documents were loaded successfully")]
    NoDocumentsLoaded,

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors related to query-time search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no index found at {0}; run: ragkit ingest")]
    IndexNotFound(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("{0}")]
    Other(String),
}
