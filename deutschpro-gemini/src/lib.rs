use deutschpro_core::CoreError;
use thiserror::Error;

pub mod client;
pub mod prompts;
pub mod schema;
pub mod wire;

pub use client::{GeminiClient, GeminiConfig};

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response had no content (finish reason: {0})")]
    Empty(String),
}

impl From<GeminiError> for CoreError {
    fn from(e: GeminiError) -> Self {
        CoreError::Backend(e.to_string())
    }
}
