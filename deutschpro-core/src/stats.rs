use crate::{Level, UserProgress};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct LevelSummary {
    pub level: Level,
    pub mastered: u32,
    pub target: u32,
}

impl LevelSummary {
    /// Share of the level target reached, capped at 100.
    pub fn percent(&self) -> f32 {
        if self.target == 0 {
            return 0.0;
        }
        (self.mastered as f32 / self.target as f32 * 100.0).min(100.0)
    }
}

pub fn level_summaries(progress: &UserProgress) -> Vec<LevelSummary> {
    Level::ALL
        .into_iter()
        .map(|level| LevelSummary {
            level,
            mastered: progress.mastered_count(level),
            target: level.target(),
        })
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct LexiconTotals {
    pub mastered: usize,
    pub learning: usize,
    pub by_type: BTreeMap<&'static str, usize>,
}

pub fn lexicon_totals(progress: &UserProgress) -> LexiconTotals {
    let mut totals = LexiconTotals {
        mastered: progress.mastered_items.len(),
        learning: progress.learning_items.len(),
        by_type: BTreeMap::new(),
    };
    for item in progress.mastered_items.iter().chain(progress.learning_items.iter()) {
        *totals.by_type.entry(item.word_type.as_str()).or_default() += 1;
    }
    totals
}
