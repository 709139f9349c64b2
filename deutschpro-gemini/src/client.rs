use crate::prompts::{batch_prompt, lookup_prompt, speech_prompt};
use crate::schema::{batch_schema, lookup_schema};
use crate::wire::{Content, GenerateRequest, GenerateResponse, GenerationConfig, SpeechConfig, ThinkingConfig};
use crate::GeminiError;
use async_trait::async_trait;
use deutschpro_core::{ChatMessage, ChunkRequest, CoreError, GenerativeBackend, Role};
use log::{debug, info, warn};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub tts_model: String,
    pub voice: String,
    pub timeout: Duration,
    /// Output ceiling for batch requests, high enough that a chunk of eight
    /// items does not normally hit it.
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            timeout: Duration::from_secs(60),
            max_output_tokens: 8192,
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    cfg: GeminiConfig,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig) -> Result<Self, GeminiError> {
        if cfg.api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(cfg.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, cfg })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.cfg.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse, GeminiError> {
        debug!("POST {} ({model})", self.endpoint(model));
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.cfg.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        if parsed.finish_reason() == Some("MAX_TOKENS") {
            warn!("{model} stopped at the output token limit; output may be truncated");
        }
        Ok(parsed)
    }

    async fn generate_text(&self, request: &GenerateRequest) -> Result<String, GeminiError> {
        let response = self.generate(&self.cfg.text_model, request).await?;
        response
            .text()
            .ok_or_else(|| GeminiError::Empty(response.finish_reason().unwrap_or("none").to_string()))
    }
}

pub fn batch_request(request: &ChunkRequest<'_>, max_output_tokens: u32) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content::text(
            Some("user"),
            batch_prompt(request.level, request.count, request.exclude),
        )],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(batch_schema()),
            max_output_tokens: Some(max_output_tokens),
            thinking_config: Some(ThinkingConfig { thinking_budget: 0 }),
            ..Default::default()
        }),
    }
}

pub fn lookup_request(word: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content::text(Some("user"), lookup_prompt(word))],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(lookup_schema()),
            ..Default::default()
        }),
    }
}

pub fn chat_request(system: &str, history: &[ChatMessage]) -> GenerateRequest {
    let contents = history
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Model => "model",
            };
            Content::text(Some(role), m.text.clone())
        })
        .collect();
    GenerateRequest {
        contents,
        system_instruction: Some(Content::text(None, system)),
        generation_config: None,
    }
}

pub fn speech_request(text: &str, voice: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content::text(None, speech_prompt(text))],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".into()]),
            speech_config: Some(SpeechConfig::prebuilt(voice)),
            ..Default::default()
        }),
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_chunk(&self, request: &ChunkRequest<'_>) -> Result<String, CoreError> {
        let body = batch_request(request, self.cfg.max_output_tokens);
        Ok(self.generate_text(&body).await?)
    }

    async fn analyze_word(&self, word: &str) -> Result<String, CoreError> {
        info!("analyzing {word:?}");
        Ok(self.generate_text(&lookup_request(word)).await?)
    }

    async fn tutor_reply(&self, system: &str, history: &[ChatMessage]) -> Result<String, CoreError> {
        let body = chat_request(system, history);
        match self.generate_text(&body).await {
            Ok(text) => Ok(text),
            // The tutor layer substitutes its own fallback for an empty turn.
            Err(GeminiError::Empty(_)) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Option<String>, CoreError> {
        let body = speech_request(text, &self.cfg.voice);
        let response = self.generate(&self.cfg.tts_model, &body).await?;
        Ok(response.inline_data().map(str::to_string))
    }
}
