use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type ItemId = String;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    pub const ALL: [Level; 6] = [Level::A1, Level::A2, Level::B1, Level::B2, Level::C1, Level::C2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }

    /// Number of mastered words that counts as completing the level.
    pub fn target(&self) -> u32 {
        match self {
            Level::A1 | Level::A2 => 1000,
            Level::B1 | Level::B2 => 1500,
            Level::C1 => 3000,
            Level::C2 => 2000,
        }
    }

    pub fn guideline(&self) -> &'static str {
        match self {
            Level::A1 => "Absolute basics (Haus, Hund).",
            Level::A2 => "Elementary level (Beruf, Wetter).",
            Level::B1 => "Intermediate level (Erfahrung, Meinung).",
            Level::B2 => "Upper-intermediate (Abstrakt, Politik).",
            Level::C1 => "Advanced academic (Wissenschaft, Justiz).",
            Level::C2 => "Mastery (Nuancen, Literatur).",
        }
    }
}

impl Level {
    /// Exact match first, then the first `A1`..`C2` token anywhere in `s`.
    pub fn parse_lenient(s: &str) -> Option<Level> {
        if let Ok(l) = s.parse() {
            return Some(l);
        }
        s.split(|c: char| !c.is_ascii_alphanumeric())
            .find_map(|tok| tok.parse().ok())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Level::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(t))
            .ok_or_else(|| format!("unknown level: {s}"))
    }
}

impl TryFrom<String> for Level {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(l: Level) -> Self {
        l.as_str().to_string()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WordType {
    Noun,
    Verb,
    Preposition,
    Adjective,
    Adverb,
    Phrase,
}

impl WordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordType::Noun => "noun",
            WordType::Verb => "verb",
            WordType::Preposition => "preposition",
            WordType::Adjective => "adjective",
            WordType::Adverb => "adverb",
            WordType::Phrase => "phrase",
        }
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Der,
    Die,
    Das,
    None,
}

impl Gender {
    pub fn article(&self) -> Option<&'static str> {
        match self {
            Gender::Der => Some("der"),
            Gender::Die => Some("die"),
            Gender::Das => Some("das"),
            Gender::None => None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerbConjugation {
    #[serde(default)]
    pub present3rd: String,
    #[serde(default)]
    pub past: String,
    #[serde(default)]
    pub past_participle: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VocabItem {
    pub id: ItemId,
    pub word: String,
    pub translation: String,
    #[serde(rename = "type")]
    pub word_type: WordType,
    pub level: Level,
    pub example: String,
    pub example_translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_irregular: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conjugation: Option<VerbConjugation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cases: Option<Vec<String>>,
}

impl VocabItem {
    pub fn new(
        word: impl Into<String>,
        translation: impl Into<String>,
        word_type: WordType,
        level: Level,
    ) -> Self {
        Self {
            id: new_item_id(),
            word: word.into(),
            translation: translation.into(),
            word_type,
            level,
            example: String::new(),
            example_translation: String::new(),
            gender: None,
            plural: None,
            is_irregular: None,
            conjugation: None,
            cases: None,
        }
    }

    /// Case-insensitive word + type, the identity used for duplicate detection.
    pub fn dedup_key(&self) -> (String, WordType) {
        (self.word.to_lowercase(), self.word_type)
    }

    pub fn same_entry(&self, other: &VocabItem) -> bool {
        self.word_type == other.word_type && self.word.to_lowercase() == other.word.to_lowercase()
    }

    /// Headword with its article for nouns, e.g. "das Haus".
    pub fn display_word(&self) -> String {
        match self.gender.and_then(|g| g.article()) {
            Some(a) if self.word_type == WordType::Noun => format!("{a} {}", self.word),
            _ => self.word.clone(),
        }
    }
}

pub fn new_item_id() -> ItemId {
    Uuid::new_v4().simple().to_string()
}

/// Item as produced by the generation backend: no id yet, optional extras.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    pub word: String,
    pub translation: String,
    #[serde(rename = "type")]
    pub word_type: WordType,
    /// Free text as the model wrote it, e.g. "B1 (Intermediate)".
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub example_translation: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub is_irregular: Option<bool>,
    #[serde(default)]
    pub conjugation: Option<VerbConjugation>,
    #[serde(default)]
    pub cases: Option<Vec<String>>,
}

impl GeneratedItem {
    /// Assigns a fresh id. `level` overrides the level the backend reported.
    pub fn into_item(self, level: Option<Level>) -> Option<VocabItem> {
        let word = self.word.trim().to_string();
        if word.is_empty() {
            return None;
        }
        let level = level.or_else(|| self.level.as_deref().and_then(Level::parse_lenient))?;
        let conjugation = match self.word_type {
            WordType::Verb => Some(self.conjugation.unwrap_or_default()),
            _ => self.conjugation,
        };
        Some(VocabItem {
            id: new_item_id(),
            word,
            translation: self.translation.trim().to_string(),
            word_type: self.word_type,
            level,
            example: self.example,
            example_translation: self.example_translation,
            gender: self.gender,
            plural: self.plural,
            is_irregular: self.is_irregular,
            conjugation,
            cases: self.cases,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub mastered_items: Vec<VocabItem>,
    #[serde(default)]
    pub learning_items: Vec<VocabItem>,
    #[serde(default)]
    pub level_stats: BTreeMap<Level, u32>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            mastered_items: Vec::new(),
            learning_items: Vec::new(),
            level_stats: Level::ALL.into_iter().map(|l| (l, 0)).collect(),
        }
    }
}

impl UserProgress {
    pub fn mastered_count(&self, level: Level) -> u32 {
        self.level_stats.get(&level).copied().unwrap_or(0)
    }

    pub fn is_mastered(&self, id: &str) -> bool {
        self.mastered_items.iter().any(|i| i.id == id)
    }

    pub fn is_learning(&self, id: &str) -> bool {
        self.learning_items.iter().any(|i| i.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&VocabItem> {
        self.mastered_items
            .iter()
            .chain(self.learning_items.iter())
            .find(|i| i.id == id)
    }

    pub fn contains_entry(&self, item: &VocabItem) -> bool {
        self.mastered_items
            .iter()
            .chain(self.learning_items.iter())
            .any(|i| i.same_entry(item))
    }

    pub fn total_items(&self) -> usize {
        self.mastered_items.len() + self.learning_items.len()
    }

    /// Every word in the lexicon, mastered first. Used as the quiz exclusion list.
    pub fn known_words(&self) -> Vec<String> {
        self.mastered_items
            .iter()
            .chain(self.learning_items.iter())
            .map(|i| i.word.clone())
            .collect()
    }

    pub fn mastered_words(&self) -> Vec<String> {
        self.mastered_items.iter().map(|i| i.word.clone()).collect()
    }

    /// Restores the invariants after loading untrusted data: every level has a
    /// counter and no id is both mastered and learning.
    pub fn normalized(mut self) -> Self {
        for l in Level::ALL {
            self.level_stats.entry(l).or_insert(0);
        }
        let mut seen = std::collections::HashSet::new();
        self.mastered_items.retain(|i| seen.insert(i.id.clone()));
        self.learning_items.retain(|i| seen.insert(i.id.clone()));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Mastered,
    StillLearning,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub mastered: Vec<VocabItem>,
    pub to_study: Vec<VocabItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub level: Level,
    pub items: Vec<VocabItem>,
    pub results: QuizResults,
}

impl QuizSession {
    pub fn new(level: Level, items: Vec<VocabItem>) -> Self {
        Self {
            level,
            items,
            results: QuizResults::default(),
        }
    }

    pub fn answered(&self) -> usize {
        self.results.mastered.len() + self.results.to_study.len()
    }

    pub fn current(&self) -> Option<&VocabItem> {
        self.items.get(self.answered())
    }

    pub fn is_complete(&self) -> bool {
        self.answered() >= self.items.len()
    }

    /// Classifies the current item. Returns false once there is nothing left to answer.
    pub fn answer(&mut self, verdict: Verdict) -> bool {
        let Some(item) = self.current().cloned() else {
            return false;
        };
        match verdict {
            Verdict::Mastered => self.results.mastered.push(item),
            Verdict::StillLearning => self.results.to_study.push(item),
        }
        true
    }

    pub fn into_results(self) -> QuizResults {
        self.results
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
