//! Configuration management for the scripture chat service.
//!
//! Configuration is merged from several sources, lowest precedence first:
//! - Built-in defaults (three corpora under `indexes/`, Gemini generation)
//! - The YAML config file (`.verse/config.yaml` or `VERSE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Everything here is read once at startup. A configuration that fails
//! [`AppConfig::validate`] must stop the process before it serves traffic.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Providers that can answer and translate.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Providers that can embed queries.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["ollama", "trigram"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .verse/ and the index artifacts)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation provider ("gemini" or "ollama")
    pub provider: String,

    /// Generation model identifier
    pub model: String,

    /// Explicit API key, takes precedence over the provider's `apiKeyEnv`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Generation provider configurations
    pub llm: LlmConfig,

    /// Query embedding configuration
    pub embedding: EmbeddingConfig,

    /// Corpora in declared order; this order drives context assembly
    pub corpora: Vec<CorpusConfig>,

    /// Retrieval settings
    pub retrieval: RetrievalConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    /// Keyed by provider name; `gemini` and `ollama` entries are read with
    /// that provider's schema
    #[serde(deserialize_with = "deserialize_providers")]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert(
            "gemini".to_string(),
            ProviderConfig::Gemini {
                api_key_env: "GEMINI_API_KEY".to_string(),
                model: "models/gemini-flash-latest".to_string(),
                endpoint: None,
            },
        );
        providers.insert(
            "ollama".to_string(),
            ProviderConfig::Ollama {
                endpoint: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
                embedding_model: Some("nomic-embed-text".to_string()),
                timeout: Some(30),
            },
        );

        Self {
            active_provider: "gemini".to_string(),
            providers,
        }
    }
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    Gemini {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        timeout: Option<u64>,
    },
}

#[derive(Deserialize)]
struct GeminiEntry {
    #[serde(rename = "apiKeyEnv", default = "default_gemini_key_env")]
    api_key_env: String,
    model: String,
    #[serde(default)]
    endpoint: Option<String>,
}

#[derive(Deserialize)]
struct OllamaEntry {
    endpoint: String,
    model: String,
    #[serde(rename = "embeddingModel", default)]
    embedding_model: Option<String>,
    #[serde(default)]
    timeout: Option<u64>,
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn deserialize_providers<'de, D>(deserializer: D) -> Result<HashMap<String, ProviderConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw: HashMap<String, serde_yaml::Value> = HashMap::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| {
            let config = match name.as_str() {
                "gemini" => serde_yaml::from_value::<GeminiEntry>(value).map(|e| {
                    ProviderConfig::Gemini {
                        api_key_env: e.api_key_env,
                        model: e.model,
                        endpoint: e.endpoint,
                    }
                }),
                "ollama" => serde_yaml::from_value::<OllamaEntry>(value).map(|e| {
                    ProviderConfig::Ollama {
                        endpoint: e.endpoint,
                        model: e.model,
                        embedding_model: e.embedding_model,
                        timeout: e.timeout,
                    }
                }),
                _ => serde_yaml::from_value::<ProviderConfig>(value),
            }
            .map_err(|e| D::Error::custom(format!("provider '{}': {}", name, e)))?;

            Ok((name, config))
        })
        .collect()
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            Self::Gemini { model, .. } => model,
            Self::Ollama { model, .. } => model,
        }
    }

    /// Custom endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Gemini { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint.as_str()),
        }
    }
}

/// Query embedding configuration.
///
/// Must match the model the offline index builder used, otherwise the
/// query vectors land in a different space than the corpus rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "ollama" or "trigram"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Whether to normalize embeddings to unit length
    #[serde(default = "default_normalize")]
    pub normalize: bool,

    /// Custom endpoint for HTTP providers
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_normalize() -> bool {
    true
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "all-mpnet-base-v2".to_string(),
            dimensions: 768,
            normalize: true,
            endpoint: None,
        }
    }
}

/// One corpus: a vector index artifact plus its parallel verse-record artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusConfig {
    /// Corpus name, used as the source key in responses
    pub name: String,

    /// Vector index artifact path
    pub index: PathBuf,

    /// Verse-record artifact path (`.toml` or `.json`)
    pub records: PathBuf,
}

impl CorpusConfig {
    fn standard(name: &str) -> Self {
        Self {
            name: name.to_string(),
            index: PathBuf::from(format!("indexes/{}.index", name)),
            records: PathBuf::from(format!("indexes/{}_id_map.toml", name)),
        }
    }
}

fn default_corpora() -> Vec<CorpusConfig> {
    ["quran", "gita", "bible"]
        .iter()
        .map(|name| CorpusConfig::standard(name))
        .collect()
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Maximum hits per corpus (not global)
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on every generation-model call, in seconds
    #[serde(rename = "generationTimeoutSecs", default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_generation_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            generation_timeout_secs: default_generation_timeout(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    embedding: Option<EmbeddingConfig>,
    corpora: Option<Vec<CorpusConfig>>,
    retrieval: Option<RetrievalConfig>,
    server: Option<ServerConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let llm = LlmConfig::default();
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: llm.active_provider.clone(),
            model: "models/gemini-flash-latest".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm,
            embedding: EmbeddingConfig::default(),
            corpora: default_corpora(),
            retrieval: RetrievalConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, the YAML file and defaults.
    ///
    /// Environment variables:
    /// - `VERSE_WORKSPACE`: Override workspace path
    /// - `VERSE_CONFIG`: Path to config file
    /// - `VERSE_PROVIDER`: Generation provider
    /// - `VERSE_MODEL`: Generation model identifier
    /// - `VERSE_API_KEY`: API key (otherwise read from the provider's `apiKeyEnv`)
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], with an explicit workspace and config file
    /// taking precedence over `VERSE_WORKSPACE` and `VERSE_CONFIG`.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("VERSE_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("VERSE_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.workspace.join(".verse/config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("VERSE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("VERSE_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("VERSE_API_KEY").ok();
        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Merge YAML configuration text into this config.
    pub fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }
            result.llm = llm;
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(corpora) = config_file.corpora {
            result.corpora = corpora;
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(server) = config_file.server {
            result.server = server;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .verse directory.
    pub fn verse_dir(&self) -> PathBuf {
        self.workspace.join(".verse")
    }

    /// Resolve an artifact path against the workspace.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Get a provider's configuration.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.providers.get(provider)
    }

    /// Custom endpoint for the given provider, if configured.
    pub fn provider_endpoint(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.endpoint())
            .map(str::to_string)
    }

    /// Resolve API key, explicit key first, then the provider's `apiKeyEnv`.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider)? {
            ProviderConfig::Gemini { api_key_env, .. } => std::env::var(api_key_env)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ProviderConfig::Ollama { .. } => None,
        }
    }

    /// Upper bound on a single generation-model call.
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.server.generation_timeout_secs)
    }

    /// Validate configuration before anything is loaded.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "gemini" && self.resolve_api_key(provider).is_none() {
            let env_var = match self.get_provider_config(provider) {
                Some(ProviderConfig::Gemini { api_key_env, .. }) => api_key_env.clone(),
                _ => "VERSE_API_KEY".to_string(),
            };
            return Err(AppError::Config(format!(
                "Missing API key for provider 'gemini': set {}",
                env_var
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "retrieval.topK must be greater than zero".to_string(),
            ));
        }

        if self.corpora.is_empty() {
            return Err(AppError::Config("No corpora configured".to_string()));
        }

        let mut seen = HashSet::new();
        for corpus in &self.corpora {
            if corpus.name.trim().is_empty() {
                return Err(AppError::Config("Corpus name cannot be empty".to_string()));
            }
            if !seen.insert(corpus.name.as_str()) {
                return Err(AppError::Config(format!(
                    "Duplicate corpus name: {}",
                    corpus.name
                )));
            }
        }

        Ok(())
    }
}
