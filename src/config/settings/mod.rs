
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Environment variable overriding the Ollama base URL, e.g. `http://localhost:11434`
pub const ENV_OLLAMA_URL: &str = "OLLAMA_URL";
/// Environment variable overriding the chat model name
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";

pub const DEFAULT_CHAT_MODEL: &str = "llama3.2:1b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text:latest";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Directory holding the source files and the persisted index artifacts
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    /// Model used for answer generation via `/api/chat`
    pub chat_model: String,
    /// Model used for corpus and query embeddings via `/api/embed`
    pub embedding_model: String,
    pub batch_size: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved to ground each answer
    pub top_k: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            retrieval: RetrievalConfig::default(),
            data_dir: default_data_dir(),
            base_dir: PathBuf::new(),
        }
    }
}

impl Default for OllamaConfig {
    #[inline]
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            batch_size: 16,
        }
    }
}

impl Default for RetrievalConfig {
    #[inline]
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid top_k: {0} (must be between 1 and 50)")]
    InvalidTopK(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from the default config directory
    #[inline]
    pub fn load() -> Result<Self> {
        let config_dir = super::get_config_dir().context("Failed to locate config directory")?;
        Self::load_from(config_dir)
    }

    /// Load configuration from a specific directory, applying environment overrides
    #[inline]
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            toml::from_str::<Config>(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            Config::default()
        };
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .apply_env_overrides()
            .context("Failed to apply environment overrides")?;

        config
            .validate()
            .context("Configuration validation failed")?;

        Ok(config)
    }

    /// Apply `OLLAMA_URL` / `OLLAMA_MODEL` overrides on top of file values
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = env::var(ENV_OLLAMA_URL) {
            let url = Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl(raw.clone()))?;
            self.ollama.protocol = url.scheme().to_string();
            self.ollama.host = url
                .host_str()
                .ok_or_else(|| ConfigError::InvalidUrl(raw.clone()))?
                .to_string();
            self.ollama.port = url
                .port_or_known_default()
                .ok_or(ConfigError::InvalidUrl(raw))?;
        }

        if let Ok(model) = env::var(ENV_OLLAMA_MODEL) {
            if model.trim().is_empty() {
                return Err(ConfigError::InvalidModel(model));
            }
            self.ollama.chat_model = model;
        }

        Ok(())
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                self.base_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ollama.validate()?;

        if self.retrieval.top_k == 0 || self.retrieval.top_k > 50 {
            return Err(ConfigError::InvalidTopK(self.retrieval.top_k));
        }

        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    /// Path of the tabular destinations source file
    #[inline]
    pub fn destinations_path(&self) -> PathBuf {
        self.data_dir.join("destinations.csv")
    }

    /// Path of the tabular routes source file
    #[inline]
    pub fn routes_path(&self) -> PathBuf {
        self.data_dir.join("routes.csv")
    }

    /// Path of the free-text tips document
    #[inline]
    pub fn tips_path(&self) -> PathBuf {
        self.data_dir.join("tips.md")
    }

    /// Directory holding the persisted index artifacts
    #[inline]
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Path of the persisted similarity index (opaque binary)
    #[inline]
    pub fn index_path(&self) -> PathBuf {
        self.index_dir().join("corpus.idx")
    }

    /// Path of the corpus metadata file, order-aligned with the index
    #[inline]
    pub fn metadata_path(&self) -> PathBuf {
        self.index_dir().join("meta.json")
    }
}

impl OllamaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))?;

        if self.chat_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.chat_model.clone()));
        }

        if self.embedding_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.embedding_model.clone()));
        }

        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }
}
