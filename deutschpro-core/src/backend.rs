use crate::{ChatMessage, CoreError, Level};
use async_trait::async_trait;

/// One bounded batch request.
#[derive(Clone, Debug)]
pub struct ChunkRequest<'a> {
    pub level: Level,
    pub count: usize,
    /// Most recent slice of the exclusion set, oldest first.
    pub exclude: &'a [String],
}

/// The hosted generation service. Text-returning methods hand back the raw
/// model output; parsing and repair happen in this crate.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Raw text that should be a JSON array of vocabulary items.
    async fn generate_chunk(&self, request: &ChunkRequest<'_>) -> Result<String, CoreError>;

    /// Raw text that should be one vocabulary object with an `exists` flag.
    async fn analyze_word(&self, word: &str) -> Result<String, CoreError>;

    /// Next tutor turn given the system instruction and the full history
    /// (ending with the user's message).
    async fn tutor_reply(&self, system: &str, history: &[ChatMessage]) -> Result<String, CoreError>;

    /// Base64-encoded 16-bit PCM, mono, 24 kHz. `None` when the service
    /// answered without audio.
    async fn synthesize_speech(&self, text: &str) -> Result<Option<String>, CoreError>;
}
