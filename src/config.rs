use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::DigestError;
use crate::llm::{LLMConfig, LLMProvider};

/// Configuration for the YouTube digest tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language model settings
    pub llm: LLMConfig,

    /// YouTube Data API settings
    pub youtube: YouTubeConfig,

    /// Transcript service settings
    pub transcript: TranscriptConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// YouTube Data API v3 key
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Supadata API key
    pub api_key: Option<String>,

    /// Override for the transcript endpoint
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base output directory
    pub base_dir: PathBuf,

    /// Log filter directive
    pub log_level: String,

    /// Write the digest JSON next to the markdown
    pub save_json: bool,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            timeout_seconds: 60,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_output_dir(),
            log_level: "youtube_digest=info,warn".to_string(),
            save_json: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("youtube-digests"))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("youtube-digest.toml"),
        PathBuf::from("config/youtube-digest.toml"),
    ];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("youtube-digest").join("config.toml"));
    }
    paths
}

fn require_key(key: &Option<String>, name: &str) -> Result<()> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(DigestError::MissingApiKey {
            name: name.to_string(),
        }
        .into()),
    }
}

impl Config {
    /// Load configuration from the first readable config file, then apply environment overrides
    pub fn load() -> Result<Self> {
        for path in config_paths() {
            if let Ok(config_str) = std::fs::read_to_string(&path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path.display());
                        config.apply_env();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(var) = self.llm.provider.api_key_env() {
            if let Ok(api_key) = std::env::var(var) {
                self.llm.api_key = Some(api_key);
            }
        }

        if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(api_key);
        }

        if let Ok(api_key) = std::env::var("SUPADATA_API_KEY") {
            self.transcript.api_key = Some(api_key);
        }

        if let Ok(output_dir) = std::env::var("YT_DIGEST_OUTPUT_DIR") {
            self.output.base_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("YT_DIGEST_LOG_LEVEL") {
            self.output.log_level = log_level;
        }
    }

    /// Switch provider, resetting model and key to the new provider's defaults
    pub fn set_provider(&mut self, provider: LLMProvider) {
        if self.llm.provider == provider {
            return;
        }
        self.llm.provider = provider;
        self.llm.model = provider.default_model().to_string();
        self.llm.endpoint = None;
        self.llm.api_key = provider.api_key_env().and_then(|var| std::env::var(var).ok());
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.llm.max_tokens == 0 {
            return Err(anyhow!("llm.max_tokens must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(anyhow!("llm.temperature must be between 0.0 and 2.0"));
        }

        if self.llm.timeout_seconds == 0
            || self.youtube.timeout_seconds == 0
            || self.transcript.timeout_seconds == 0
        {
            return Err(anyhow!("timeouts must be greater than 0"));
        }

        if let Some(var) = self.llm.provider.api_key_env() {
            require_key(&self.llm.api_key, var)?;
        }
        require_key(&self.youtube.api_key, "YOUTUBE_API_KEY")?;
        require_key(&self.transcript.api_key, "SUPADATA_API_KEY")?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "YouTube Digest Configuration:\n\
            - LLM Provider: {:?}\n\
            - Model: {}\n\
            - Endpoint: {}\n\
            - Output Directory: {}\n\
            - Save JSON: {}",
            self.llm.provider,
            self.llm.model,
            self.llm.endpoint(),
            self.output.base_dir.display(),
            self.output.save_json
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_provider(mut self, provider: LLMProvider) -> Self {
        self.config.llm.provider = provider;
        self.config.llm.model = provider.default_model().to_string();
        self
    }

    pub fn with_llm_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.llm.api_key = Some(api_key.into());
        self
    }

    pub fn with_youtube_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.youtube.api_key = Some(api_key.into());
        self
    }

    pub fn with_transcript_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.transcript.api_key = Some(api_key.into());
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.base_dir = dir;
        self
    }

    pub fn save_json(mut self, enable: bool) -> Self {
        self.config.output.save_json = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
