//! Google Gemini embedding client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EmbeddingError;
use crate::models::EmbeddingConfig;
use crate::utils::retry::{RetryConfig, with_retry};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One entry in a `batchEmbedContents` request.
#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Client for the Gemini embedding API.
#[derive(Debug, Clone)]
pub struct GeminiEmbeddings {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    batch_size: usize,
}

impl GeminiEmbeddings {
    /// Create a new embedding client with the given API key and configuration.
    pub fn new(api_key: &str, config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: GEMINI_API_BASE.to_string(),
            api_key: api_key.to_string(),
            model: config.model_name.clone(),
            batch_size: config.batch_size.max(1) as usize,
        })
    }

    /// Model name this client embeds with.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Generate embeddings for a batch of texts, in input order.
    /// Requests are issued in `batch_size` slices with transient-error retry.
    pub async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let retry_config = RetryConfig::default();
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for slice in texts.chunks(self.batch_size) {
            let embeddings = with_retry(&retry_config, || self.embed_slice(slice))
                .await
                .into_result()?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    /// Generate an embedding for a single query string.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let embeddings = self.embed_batch(vec![text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embedding response".to_string()))
    }

    async fn embed_slice(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!(
            "{}/models/{}:batchEmbedContents",
            self.base_url, self.model
        );
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{}", self.model),
                    content: Content {
                        parts: vec![Part { text: text.clone() }],
                    },
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout
                } else {
                    EmbeddingError::RequestError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServerError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let batch: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        if batch.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                batch.embeddings.len()
            )));
        }

        Ok(batch.embeddings.into_iter().map(|e| e.values).collect())
    }
}
