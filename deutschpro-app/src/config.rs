use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use deutschpro_core::BatchPolicy;
use deutschpro_gemini::client::{DEFAULT_BASE_URL, DEFAULT_TEXT_MODEL, DEFAULT_TTS_MODEL, DEFAULT_VOICE};
use deutschpro_gemini::GeminiConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_quiz_size")]
    pub quiz_size: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_max_loops")]
    pub max_loops: usize,
    #[serde(default = "default_exclusion_window")]
    pub exclusion_window: usize,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}
fn default_tts_model() -> String {
    DEFAULT_TTS_MODEL.to_string()
}
fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}
fn default_quiz_size() -> usize {
    50
}
fn default_chunk_size() -> usize {
    deutschpro_core::CHUNK_SIZE
}
fn default_max_loops() -> usize {
    deutschpro_core::MAX_LOOPS
}
fn default_exclusion_window() -> usize {
    deutschpro_core::EXCLUSION_WINDOW
}
fn default_cooldown_ms() -> u64 {
    400
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_max_output_tokens() -> u32 {
    8192
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_model: default_text_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            quiz_size: default_quiz_size(),
            chunk_size: default_chunk_size(),
            max_loops: default_max_loops(),
            exclusion_window: default_exclusion_window(),
            cooldown_ms: default_cooldown_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        deutschpro_json::paths::config_root().join("config.toml")
    }

    /// Reads `path` (or the default location). A missing file means defaults;
    /// a file that does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy {
            chunk_size: self.chunk_size.max(1),
            max_loops: self.max_loops.max(1),
            exclusion_window: self.exclusion_window,
            cooldown: Duration::from_millis(self.cooldown_ms),
            ..BatchPolicy::default()
        }
    }

    pub fn gemini(&self, api_key: String) -> GeminiConfig {
        GeminiConfig {
            api_key,
            base_url: self.base_url.clone(),
            text_model: self.text_model.clone(),
            tts_model: self.tts_model.clone(),
            voice: self.voice.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            max_output_tokens: self.max_output_tokens,
        }
    }
}

/// `GEMINI_API_KEY`, falling back to `API_KEY`.
pub fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|k| std::env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
