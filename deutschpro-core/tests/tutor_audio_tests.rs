use async_trait::async_trait;
use deutschpro_core::audio::{decode_speech, pcm16_to_f32, PlaybackGate, SAMPLE_RATE};
use deutschpro_core::tutor::{TutorSession, EMPTY_REPLY, GREETING, RESTART_GREETING};
use deutschpro_core::{ChatMessage, ChunkRequest, CoreError, GenerativeBackend, Role};
use parking_lot::Mutex;

struct Echo {
    fail: bool,
    seen_system: Mutex<Option<String>>,
}

#[async_trait]
impl GenerativeBackend for Echo {
    async fn generate_chunk(&self, _request: &ChunkRequest<'_>) -> Result<String, CoreError> {
        Ok("[]".into())
    }

    async fn analyze_word(&self, _word: &str) -> Result<String, CoreError> {
        Err(CoreError::Backend("unused".into()))
    }

    async fn tutor_reply(&self, system: &str, history: &[ChatMessage]) -> Result<String, CoreError> {
        *self.seen_system.lock() = Some(system.to_string());
        if self.fail {
            return Err(CoreError::Backend("quota".into()));
        }
        let last = history.last().map(|m| m.text.clone()).unwrap_or_default();
        if last == "schweigen" {
            return Ok("   ".into());
        }
        Ok(format!("Du hast gesagt: {last}"))
    }

    async fn synthesize_speech(&self, _text: &str) -> Result<Option<String>, CoreError> {
        Ok(None)
    }
}

#[tokio::test]
async fn tutor_turns_accumulate_history() {
    let backend = Echo { fail: false, seen_system: Mutex::new(None) };
    let words = vec!["Haus".to_string(), "Hund".to_string()];
    let mut chat = TutorSession::new(&words, Vec::new());
    assert_eq!(chat.history().len(), 1);
    assert_eq!(chat.history()[0].text, GREETING);

    let reply = chat.send(&backend, "Hallo").await.unwrap();
    assert_eq!(reply.role, Role::Model);
    assert_eq!(reply.text, "Du hast gesagt: Hallo");
    assert_eq!(chat.history().len(), 3);
    assert!(backend.seen_system.lock().as_deref().unwrap().contains("Haus, Hund"));

    let reply = chat.send(&backend, "schweigen").await.unwrap();
    assert_eq!(reply.text, EMPTY_REPLY);

    chat.reset();
    assert_eq!(chat.history().len(), 1);
    assert_eq!(chat.history()[0].text, RESTART_GREETING);
}

#[tokio::test]
async fn failed_turn_keeps_user_message_only() {
    let backend = Echo { fail: true, seen_system: Mutex::new(None) };
    let mut chat = TutorSession::new(&[], vec![ChatMessage::new(Role::Model, "Hi")]);
    assert!(chat.send(&backend, "Wie geht's?").await.is_err());
    assert_eq!(chat.history().len(), 2);
    assert_eq!(chat.history()[1].role, Role::User);
    assert!(matches!(chat.send(&backend, "  ").await, Err(CoreError::Invalid(_))));
}

#[test]
fn pcm_decoding_scales_and_ignores_odd_byte() {
    let bytes = [0x00, 0x80, 0xff, 0x7f, 0x00, 0x00, 0x12];
    let s = pcm16_to_f32(&bytes);
    assert_eq!(s.len(), 3);
    assert_eq!(s[0], -1.0);
    assert!((s[1] - 32767.0 / 32768.0).abs() < f32::EPSILON);
    assert_eq!(s[2], 0.0);
}

#[test]
fn speech_payload_decodes_to_clip() {
    // two samples: 0x4000 (0.5) and 0xC000 (-0.5)
    let clip = decode_speech("AEAAwA==").unwrap();
    assert_eq!(clip.sample_rate, SAMPLE_RATE);
    assert_eq!(clip.samples, vec![0.5, -0.5]);
    assert_eq!(clip.to_i16(), vec![16384, -16384]);
    assert!(decode_speech("%%%").is_err());
}

#[test]
fn playback_gate_admits_one_at_a_time() {
    let gate = PlaybackGate::new();
    let first = gate.try_start();
    assert!(first.is_some());
    assert!(gate.is_playing());
    assert!(gate.clone().try_start().is_none());
    drop(first);
    assert!(!gate.is_playing());
    assert!(gate.try_start().is_some());
}
