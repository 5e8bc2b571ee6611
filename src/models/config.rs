use serde::{Deserialize, Serialize};

pub const DEFAULT_DOCS_DIR: &str = "data/rag_docs";
pub const DEFAULT_INDEX_DIR: &str = "rag/vectorstore";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// API credentials for the supported providers, one optional slot each.
///
/// Passed explicitly into the model loader so tests can construct arbitrary
/// credential sets without touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub google: Option<String>,
    pub groq: Option<String>,
    pub openai: Option<String>,
}

impl Credentials {
    /// Read credentials from the environment.
    /// `GEMINI_API_KEY` is accepted as an alias for `GOOGLE_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            google: env_non_empty("GOOGLE_API_KEY").or_else(|| env_non_empty("GEMINI_API_KEY")),
            groq: env_non_empty("GROQ_API_KEY"),
            openai: env_non_empty("OPENAI_API_KEY"),
        }
    }

    /// True if no slot holds a usable key.
    pub fn is_empty(&self) -> bool {
        self.google.is_none() && self.groq.is_none() && self.openai.is_none()
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub ingestion: IngestionConfig,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("ragkit").join("config.toml"))
    }

    pub fn load() -> Result<Self, crate::error::ConfigError> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<(), crate::error::ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            crate::error::ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

/// Per-provider chat model settings, keyed by provider name in the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(
        default = "default_openai_settings",
        skip_serializing_if = "Option::is_none"
    )]
    pub openai: Option<ProviderSettings>,

    #[serde(
        default = "default_google_settings",
        skip_serializing_if = "Option::is_none"
    )]
    pub google: Option<ProviderSettings>,

    #[serde(
        default = "default_groq_settings",
        skip_serializing_if = "Option::is_none"
    )]
    pub groq: Option<ProviderSettings>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: default_openai_settings(),
            google: default_google_settings(),
            groq: default_groq_settings(),
        }
    }
}

fn default_openai_settings() -> Option<ProviderSettings> {
    Some(ProviderSettings::new("gpt-4o-mini"))
}

fn default_google_settings() -> Option<ProviderSettings> {
    Some(ProviderSettings::new("gemini-2.0-flash"))
}

fn default_groq_settings() -> Option<ProviderSettings> {
    Some(ProviderSettings::new("llama-3.3-70b-versatile"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub model_name: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl ProviderSettings {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> u32 {
    2048
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model_name: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_batch_size() -> u32 {
    16
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_embedding_model(),
            timeout_secs: default_timeout(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    #[serde(default = "default_index_dir")]
    pub index_dir: String,

    /// Chunk budget in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Overlap between neighboring chunks, in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: u32,
}

fn default_docs_dir() -> String {
    DEFAULT_DOCS_DIR.to_string()
}

fn default_index_dir() -> String {
    DEFAULT_INDEX_DIR.to_string()
}

fn default_chunk_size() -> u32 {
    800
}

fn default_chunk_overlap() -> u32 {
    200
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            index_dir: default_index_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}
