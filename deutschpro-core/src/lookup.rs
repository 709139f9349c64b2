use crate::backend::GenerativeBackend;
use crate::repair::strip_code_fence;
use crate::{CoreError, GeneratedItem, VocabItem};
use log::warn;
use serde_json::Value;

/// Parses the backend's single-word analysis. `exists: false` is honoured
/// before the rest of the object is looked at, so a sparse rejection still
/// reads as a missing word rather than a broken reply.
pub fn parse_lookup(raw: &str, query: &str) -> Result<VocabItem, CoreError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw)).map_err(|e| {
        warn!("word analysis for {query:?} did not parse: {e}");
        CoreError::Backend("malformed word analysis".into())
    })?;
    if value.get("exists").and_then(Value::as_bool) == Some(false) {
        return Err(CoreError::NoSuchWord(query.to_string()));
    }
    let generated: GeneratedItem = serde_json::from_value(value).map_err(|e| {
        warn!("word analysis for {query:?} is missing fields: {e}");
        CoreError::Backend("malformed word analysis".into())
    })?;
    if generated.word.trim().is_empty() {
        return Err(CoreError::Backend("word analysis without a word".into()));
    }
    generated
        .into_item(None)
        .ok_or(CoreError::Invalid("the word analysis did not name a CEFR level (A1 to C2)"))
}

/// Looks up one word. Duplicate checks against the lexicon are the caller's job.
pub async fn lookup_word(backend: &dyn GenerativeBackend, word: &str) -> Result<VocabItem, CoreError> {
    let query = word.trim();
    if query.is_empty() {
        return Err(CoreError::Invalid("empty word"));
    }
    let raw = backend.analyze_word(query).await?;
    parse_lookup(&raw, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Level, WordType};

    #[test]
    fn parses_verb_with_conjugation() {
        let raw = r#"{"exists":true,"word":"gehen","translation":"to go","type":"verb","level":"a1",
            "example":"Ich gehe.","exampleTranslation":"I go.",
            "conjugation":{"present3rd":"geht","past":"ging","pastParticiple":"ist gegangen"}}"#;
        let item = parse_lookup(raw, "gehen").unwrap();
        assert_eq!(item.word_type, WordType::Verb);
        assert_eq!(item.level, Level::A1);
        assert_eq!(item.conjugation.unwrap().past_participle, "ist gegangen");
    }

    #[test]
    fn non_existent_word_is_soft_rejection() {
        let raw = r#"{"exists":false,"word":"Blorf","translation":"","type":"noun","level":"A1","example":"","exampleTranslation":""}"#;
        assert!(matches!(parse_lookup(raw, "Blorf"), Err(CoreError::NoSuchWord(w)) if w == "Blorf"));
    }

    #[test]
    fn bare_rejection_is_still_no_such_word() {
        assert!(matches!(parse_lookup(r#"{"exists":false}"#, "Blorf"), Err(CoreError::NoSuchWord(_))));
        assert!(matches!(
            parse_lookup(r#"{"exists":false,"word":"Blorf"}"#, "Blorf"),
            Err(CoreError::NoSuchWord(_))
        ));
    }

    #[test]
    fn descriptive_level_falls_back_to_its_cefr_token() {
        let raw = r#"{"exists":true,"word":"Erfahrung","translation":"experience","type":"noun",
            "level":"B1 (Intermediate)","gender":"die","plural":"Erfahrungen"}"#;
        let item = parse_lookup(raw, "Erfahrung").unwrap();
        assert_eq!(item.level, Level::B1);
    }

    #[test]
    fn level_without_cefr_token_is_rejected_clearly() {
        let raw = r#"{"exists":true,"word":"Haus","translation":"house","type":"noun","level":"beginner"}"#;
        assert!(matches!(parse_lookup(raw, "Haus"), Err(CoreError::Invalid(m)) if m.contains("CEFR")));
    }

    #[test]
    fn garbage_is_backend_error() {
        assert!(parse_lookup("{\"word\":", "x").unwrap_err().is_backend());
    }
}
