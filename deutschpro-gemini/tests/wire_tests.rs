use deutschpro_core::{ChatMessage, ChunkRequest, CoreError, Level, Role};
use deutschpro_gemini::client::{batch_request, chat_request, lookup_request, speech_request};
use deutschpro_gemini::wire::GenerateResponse;
use deutschpro_gemini::{GeminiClient, GeminiConfig, GeminiError};

#[test]
fn batch_request_body_shape() {
    let exclude = vec!["Haus".to_string()];
    let req = ChunkRequest { level: Level::B1, count: 8, exclude: &exclude };
    let v = serde_json::to_value(batch_request(&req, 8192)).unwrap();

    assert_eq!(v["contents"][0]["role"], "user");
    assert!(v["contents"][0]["parts"][0]["text"].as_str().unwrap().contains("EXCLUDE strictly: Haus."));
    let cfg = &v["generationConfig"];
    assert_eq!(cfg["responseMimeType"], "application/json");
    assert_eq!(cfg["maxOutputTokens"], 8192);
    assert_eq!(cfg["thinkingConfig"]["thinkingBudget"], 0);
    assert_eq!(cfg["responseSchema"]["type"], "ARRAY");
    assert_eq!(cfg["responseSchema"]["items"]["properties"]["type"]["enum"][1], "verb");
    assert!(cfg.get("speechConfig").is_none());
    assert!(v.get("systemInstruction").is_none());
}

#[test]
fn lookup_schema_requires_exists() {
    let v = serde_json::to_value(lookup_request("gehen")).unwrap();
    let required = v["generationConfig"]["responseSchema"]["required"].as_array().unwrap();
    assert!(required.iter().any(|r| r == "exists"));
    assert_eq!(
        v["generationConfig"]["responseSchema"]["properties"]["exists"]["type"],
        "BOOLEAN"
    );
}

#[test]
fn chat_request_maps_roles_and_system() {
    let history = vec![
        ChatMessage::new(Role::Model, "Hallo!"),
        ChatMessage::new(Role::User, "Guten Tag"),
    ];
    let v = serde_json::to_value(chat_request("German tutor.", &history)).unwrap();
    assert_eq!(v["contents"][0]["role"], "model");
    assert_eq!(v["contents"][1]["role"], "user");
    assert_eq!(v["contents"][1]["parts"][0]["text"], "Guten Tag");
    assert_eq!(v["systemInstruction"]["parts"][0]["text"], "German tutor.");
    assert!(v.get("generationConfig").is_none());
}

#[test]
fn speech_request_asks_for_audio() {
    let v = serde_json::to_value(speech_request("Haus", "Kore")).unwrap();
    assert_eq!(v["contents"][0]["parts"][0]["text"], "German: Haus");
    assert_eq!(v["generationConfig"]["responseModalities"][0], "AUDIO");
    assert_eq!(
        v["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
        "Kore"
    );
}

#[test]
fn response_text_and_audio_extraction() {
    let raw = r#"{
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "[{\"word\":"}, {"text": "\"Haus\"}]"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"totalTokenCount": 10}
    }"#;
    let r: GenerateResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(r.text().as_deref(), Some(r#"[{"word":"Haus"}]"#));
    assert_eq!(r.finish_reason(), Some("STOP"));
    assert!(r.inline_data().is_none());

    let audio = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"audio/L16;rate=24000","data":"AEAAwA=="}}]}}]}"#;
    let r: GenerateResponse = serde_json::from_str(audio).unwrap();
    assert_eq!(r.inline_data(), Some("AEAAwA=="));
    assert!(r.text().is_none());

    let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
    assert!(empty.text().is_none());
}

#[test]
fn client_requires_api_key_and_builds_endpoint() {
    assert!(matches!(
        GeminiClient::new(GeminiConfig::default()),
        Err(GeminiError::MissingApiKey)
    ));
    let client = GeminiClient::new(GeminiConfig {
        api_key: "k".into(),
        base_url: "http://localhost:9/".into(),
        ..GeminiConfig::default()
    })
    .unwrap();
    assert_eq!(
        client.endpoint("m1"),
        "http://localhost:9/v1beta/models/m1:generateContent"
    );
}

#[test]
fn gemini_errors_become_backend_errors() {
    let e: CoreError = GeminiError::Status { status: 503, body: "busy".into() }.into();
    assert!(e.is_backend());
    assert!(e.to_string().contains("503"));
}
