use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generation::FallbackPolicy;
use crate::generation::fallback::default_continuations;
use crate::streaming::{InsertMode, StreamingInserter};

const CONFIG_PATH: &str = ".ghostwriter/config.toml";

/// Configuration from `.ghostwriter/config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
}

/// Where continuations come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "openai/gpt-oss-120b".to_string(),
            temperature: 0.7,
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Simulated latency before a fallback continuation is used.
    pub fallback_delay_ms: u64,
    pub fallback_continuations: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            fallback_delay_ms: 2000,
            fallback_continuations: default_continuations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    pub char_delay_ms: u64,
    pub mode: InsertMode,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: 10,
            mode: InsertMode::Streaming,
        }
    }
}

impl Config {
    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            delay: Duration::from_millis(self.generation.fallback_delay_ms),
            continuations: self.generation.fallback_continuations.clone(),
        }
    }

    pub fn inserter(&self) -> StreamingInserter {
        StreamingInserter::new(
            Duration::from_millis(self.streaming.char_delay_ms),
            self.streaming.mode,
        )
    }
}

/// Load configuration from `.ghostwriter/config.toml` under `dir`.
///
/// Falls back to defaults if the file is missing.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_file(&path)
}

/// Load configuration from an explicit path, which must exist.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}
