use crate::backend::GenerativeBackend;
use crate::{ChatMessage, CoreError, Role};
use log::error;

pub const GREETING: &str = "Hallo! Ich bin dein DeutschPro Coach. Lass uns sprechen! Ich benutze nur die Wörter, die du schon gelernt hast. Wie geht es dir heute?";
pub const RESTART_GREETING: &str =
    "Hallo! Lass uns neu anfangen. Wie kann ich dir heute mit deinem Deutsch helfen?";
pub const EMPTY_REPLY: &str = "Entschuldigung, ich habe das nicht verstanden.";

pub fn system_instruction(known_words: &[String]) -> String {
    format!(
        "German tutor. Use words: [{}]. Focus on active usage.",
        known_words.join(", ")
    )
}

/// A conversation with the tutor. The history is owned here and handed
/// back to the store after every turn.
pub struct TutorSession {
    system: String,
    history: Vec<ChatMessage>,
}

impl TutorSession {
    /// Resumes `history`, or starts with the greeting when it is empty.
    pub fn new(known_words: &[String], history: Vec<ChatMessage>) -> Self {
        let history = if history.is_empty() {
            vec![ChatMessage::new(Role::Model, GREETING)]
        } else {
            history
        };
        Self {
            system: system_instruction(known_words),
            history,
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn reset(&mut self) {
        self.history = vec![ChatMessage::new(Role::Model, RESTART_GREETING)];
    }

    /// Sends one user turn. On failure the user message stays in the history
    /// and no model message is added.
    pub async fn send(
        &mut self,
        backend: &dyn GenerativeBackend,
        text: &str,
    ) -> Result<&ChatMessage, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::Invalid("empty message"));
        }
        self.history.push(ChatMessage::new(Role::User, text));
        let reply = match backend.tutor_reply(&self.system, &self.history).await {
            Ok(r) => r,
            Err(e) => {
                error!("tutor turn failed: {e}");
                return Err(e);
            }
        };
        let reply = if reply.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply.trim().to_string()
        };
        self.history.push(ChatMessage::new(Role::Model, reply));
        Ok(&self.history[self.history.len() - 1])
    }
}
