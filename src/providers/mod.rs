//! Provider selection and model loading.
//!
//! Embeddings are single-provider (Google Gemini). Chat LLMs are selected by
//! a fixed priority order with fall-through on construction failure.

mod chat;
mod embeddings;

pub use chat::{ChatClient, ChatOptions};
pub use embeddings::GeminiEmbeddings;

use tracing::{info, warn};

use crate::error::{ConfigError, ModelError};
use crate::models::{Config, Credentials, ProviderSettings};

/// The supported model providers, in no particular order.
///
/// `PRIORITY` fixes the order `load_llm` traverses; each variant knows which
/// environment variable gates it and whether its chat API accepts an output
/// token limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Google,
    Groq,
}

impl Provider {
    /// Fixed fallback order for chat model selection.
    pub const PRIORITY: [Provider; 3] = [Provider::OpenAi, Provider::Google, Provider::Groq];

    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Google => "GOOGLE_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
        }
    }

    /// Whether the provider's chat API takes a max-output-token budget.
    /// Groq's is omitted; only temperature is forwarded there.
    pub fn supports_max_tokens(&self) -> bool {
        !matches!(self, Provider::Groq)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Google => write!(f, "google"),
            Provider::Groq => write!(f, "groq"),
        }
    }
}

/// Constructs embedding and chat clients from explicit credentials and
/// provider configuration.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    credentials: Credentials,
    config: Config,
}

impl ModelLoader {
    /// Validate the credential set and build a loader.
    ///
    /// At least one provider credential must be present.
    pub fn new(credentials: Credentials, config: Config) -> Result<Self, ConfigError> {
        if credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }

        let loader = Self {
            credentials,
            config,
        };
        let available: Vec<String> = loader
            .available_providers()
            .iter()
            .map(ToString::to_string)
            .collect();
        info!(providers = ?available, "available model providers");

        Ok(loader)
    }

    /// Providers with a usable credential, in priority order.
    pub fn available_providers(&self) -> Vec<Provider> {
        Provider::PRIORITY
            .into_iter()
            .filter(|p| self.credential_for(*p).is_some())
            .collect()
    }

    fn credential_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.credentials.openai.as_deref(),
            Provider::Google => self.credentials.google.as_deref(),
            Provider::Groq => self.credentials.groq.as_deref(),
        }
    }

    fn settings_for(&self, provider: Provider) -> Option<&ProviderSettings> {
        match provider {
            Provider::OpenAi => self.config.providers.openai.as_ref(),
            Provider::Google => self.config.providers.google.as_ref(),
            Provider::Groq => self.config.providers.groq.as_ref(),
        }
    }

    /// Build the embedding client. Embeddings require the Google credential
    /// specifically, regardless of which other providers are configured.
    pub fn load_embeddings(&self) -> Result<GeminiEmbeddings, ModelError> {
        let api_key = self.credentials.google.as_deref().ok_or_else(|| {
            ModelError::Config(ConfigError::MissingCredential(
                "GOOGLE_API_KEY (or GEMINI_API_KEY); embeddings require the Google Gemini API"
                    .to_string(),
            ))
        })?;

        info!(model = %self.config.embedding.model_name, "loading embedding model");
        GeminiEmbeddings::new(api_key, &self.config.embedding).map_err(|e| {
            ModelError::Construction {
                provider: Provider::Google.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Build a chat client, trying providers in priority order
    /// (OpenAI, then Google, then Groq).
    ///
    /// Candidates need both a credential and a config entry. A candidate
    /// whose construction fails is logged and skipped; the list is traversed
    /// once, to first success or exhaustion.
    pub fn load_llm(&self) -> Result<ChatClient, ModelError> {
        let candidates: Vec<Provider> = Provider::PRIORITY
            .into_iter()
            .filter(|p| self.credential_for(*p).is_some() && self.settings_for(*p).is_some())
            .collect();

        if candidates.is_empty() {
            return Err(ModelError::NoProvidersConfigured);
        }

        let mut last_error: Option<ModelError> = None;
        for provider in candidates {
            match self.build_chat(provider) {
                Ok(client) => {
                    info!(
                        provider = %provider,
                        model = %client.model_name(),
                        "loaded LLM"
                    );
                    return Ok(client);
                }
                Err(e) => {
                    warn!(provider = %provider, error = %e, "LLM provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(ModelError::AllProvidersFailed {
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    fn build_chat(&self, provider: Provider) -> Result<ChatClient, ModelError> {
        let api_key = self
            .credential_for(provider)
            .ok_or_else(|| ModelError::Config(ConfigError::MissingCredential(
                provider.env_var().to_string(),
            )))?;
        let settings = self.settings_for(provider).ok_or_else(|| {
            ModelError::Config(ConfigError::MissingProviderConfig(provider.to_string()))
        })?;

        let options = ChatOptions {
            model: settings.model_name.clone(),
            temperature: settings.temperature,
            max_tokens: provider
                .supports_max_tokens()
                .then_some(settings.max_output_tokens),
        };

        match provider {
            Provider::OpenAi => ChatClient::openai(api_key, options),
            Provider::Google => ChatClient::google(api_key, options),
            Provider::Groq => ChatClient::groq(api_key, options),
        }
    }
}
