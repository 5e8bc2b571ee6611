//! Chat LLM clients for the supported providers.
//!
//! OpenAI and Groq speak the same chat-completions protocol and share one
//! client type; Google's Gemini API has its own request shape. Construction
//! is offline: it validates settings and builds the HTTP client, nothing more.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Provider;
use crate::error::ModelError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Settings a chat client is constructed with.
///
/// `max_tokens` is `None` for providers that don't take an output budget.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

#[async_trait]
trait CompletionModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// A ready-to-use chat client for one provider.
#[derive(Debug, Clone)]
pub enum ChatClient {
    OpenAi(OpenAiCompatChat),
    Google(GoogleChat),
    Groq(OpenAiCompatChat),
}

impl ChatClient {
    pub fn openai(api_key: &str, options: ChatOptions) -> Result<Self, ModelError> {
        OpenAiCompatChat::new(Provider::OpenAi, OPENAI_CHAT_URL, api_key, options)
            .map(ChatClient::OpenAi)
    }

    pub fn groq(api_key: &str, options: ChatOptions) -> Result<Self, ModelError> {
        OpenAiCompatChat::new(Provider::Groq, GROQ_CHAT_URL, api_key, options)
            .map(ChatClient::Groq)
    }

    pub fn google(api_key: &str, options: ChatOptions) -> Result<Self, ModelError> {
        GoogleChat::new(api_key, options).map(ChatClient::Google)
    }

    /// Which provider backs this client.
    pub fn provider(&self) -> Provider {
        match self {
            ChatClient::OpenAi(_) => Provider::OpenAi,
            ChatClient::Google(_) => Provider::Google,
            ChatClient::Groq(_) => Provider::Groq,
        }
    }

    /// Model name this client completes with.
    pub fn model_name(&self) -> &str {
        match self {
            ChatClient::OpenAi(c) | ChatClient::Groq(c) => &c.options.model,
            ChatClient::Google(c) => &c.options.model,
        }
    }

    /// Send a single-turn prompt and return the completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        match self {
            ChatClient::OpenAi(c) | ChatClient::Groq(c) => c.complete(prompt).await,
            ChatClient::Google(c) => c.complete(prompt).await,
        }
    }
}

fn validated_options(provider: Provider, options: ChatOptions) -> Result<ChatOptions, ModelError> {
    if options.model.trim().is_empty() {
        return Err(ModelError::Construction {
            provider: provider.to_string(),
            message: "model name is empty".to_string(),
        });
    }
    Ok(options)
}

fn build_http_client(provider: Provider) -> Result<Client, ModelError> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ModelError::Construction {
            provider: provider.to_string(),
            message: e.to_string(),
        })
}

/// Chat-completions client for OpenAI and OpenAI-compatible APIs (Groq).
#[derive(Debug, Clone)]
pub struct OpenAiCompatChat {
    client: Client,
    url: String,
    api_key: String,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiCompatChat {
    fn new(
        provider: Provider,
        url: &str,
        api_key: &str,
        options: ChatOptions,
    ) -> Result<Self, ModelError> {
        let options = validated_options(provider, options)?;
        let client = build_http_client(provider)?;
        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
            options,
        })
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompatChat {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = ChatCompletionRequest {
            model: self.options.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::InvalidResponse(format!(
                "status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ModelError::InvalidResponse("no completion choices".to_string()))
    }
}

/// Chat client for the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GoogleChat {
    client: Client,
    base_url: String,
    api_key: String,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GoogleChat {
    fn new(api_key: &str, options: ChatOptions) -> Result<Self, ModelError> {
        let options = validated_options(Provider::Google, options)?;
        let client = build_http_client(Provider::Google)?;
        Ok(Self {
            client,
            base_url: GEMINI_API_BASE.to_string(),
            api_key: api_key.to_string(),
            options,
        })
    }
}

#[async_trait]
impl CompletionModel for GoogleChat {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.options.model
        );
        let request = GenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.options.temperature,
                max_output_tokens: self.options.max_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::InvalidResponse(format!(
                "status {}: {}",
                status, body
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ModelError::InvalidResponse("no candidates returned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(model: &str) -> ChatOptions {
        ChatOptions {
            model: model.to_string(),
            temperature: 0.2,
            max_tokens: Some(2048),
        }
    }

    #[test]
    fn test_construction_rejects_empty_model() {
        let err = ChatClient::openai("sk-test", options("")).unwrap_err();
        assert!(matches!(err, ModelError::Construction { .. }));

        let err = ChatClient::google("key", options("   ")).unwrap_err();
        assert!(matches!(err, ModelError::Construction { .. }));
    }

    #[test]
    fn test_provider_tags() {
        let client = ChatClient::openai("sk-test", options("gpt-4o-mini")).unwrap();
        assert_eq!(client.provider(), Provider::OpenAi);
        assert_eq!(client.model_name(), "gpt-4o-mini");

        let client = ChatClient::groq("gsk-test", options("llama-3.3-70b-versatile")).unwrap();
        assert_eq!(client.provider(), Provider::Groq);

        let client = ChatClient::google("key", options("gemini-2.0-flash")).unwrap();
        assert_eq!(client.provider(), Provider::Google);
    }

    #[test]
    fn test_max_tokens_omitted_from_request_when_none() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![],
            temperature: 0.2,
            max_tokens: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("max_tokens"));
    }
}
