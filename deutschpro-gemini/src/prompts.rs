use deutschpro_core::Level;

pub fn batch_prompt(level: Level, count: usize, exclude: &[String]) -> String {
    let exclusion = if exclude.is_empty() {
        String::new()
    } else {
        format!("EXCLUDE strictly: {}.", exclude.join(", "))
    };
    format!(
        "Act as a German philologist. Generate EXACTLY {count} UNIQUE German vocabulary items for level {level}.

VERBS: when type is 'verb', the 'conjugation' object MUST contain
- \"present3rd\": third person singular present
- \"past\": Präteritum
- \"pastParticiple\": Perfekt including the auxiliary

FORMAT:
1. No markdown.
2. Nouns must have \"plural\" and \"gender\".
3. No duplicates.

{exclusion}
Level: {level} ({guide})",
        guide = level.guideline()
    )
}

pub fn lookup_prompt(word: &str) -> String {
    format!(
        "German philologist analysis for: \"{word}\". Set \"exists\" to false if this is not a German word. \
         If it is a verb, provide conjugation present3rd/past/pastParticiple."
    )
}

pub fn speech_prompt(text: &str) -> String {
    format!("German: {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_prompt_mentions_count_level_and_exclusions() {
        let p = batch_prompt(Level::B1, 8, &["Haus".into(), "Hund".into()]);
        assert!(p.contains("EXACTLY 8"));
        assert!(p.contains("level B1"));
        assert!(p.contains("Erfahrung, Meinung"));
        assert!(p.contains("EXCLUDE strictly: Haus, Hund."));
        assert!(!batch_prompt(Level::A1, 3, &[]).contains("EXCLUDE"));
    }
}
