use crate::{UserProgress, VocabItem, WordType};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexiconTab {
    Mastered,
    Learning,
    All,
}

pub fn filter_by_text(items: &[VocabItem], query: &str) -> Vec<VocabItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|i| i.word.to_lowercase().contains(&q) || i.translation.to_lowercase().contains(&q))
        .cloned()
        .collect()
}

pub fn filter_by_type(items: &[VocabItem], word_type: WordType) -> Vec<VocabItem> {
    items.iter().filter(|i| i.word_type == word_type).cloned().collect()
}

/// Items shown on a lexicon tab. `All` lists mastered first and never shows an
/// id twice.
pub fn lexicon_view(progress: &UserProgress, tab: LexiconTab, query: &str) -> Vec<VocabItem> {
    let items: Vec<VocabItem> = match tab {
        LexiconTab::Mastered => progress.mastered_items.clone(),
        LexiconTab::Learning => progress.learning_items.clone(),
        LexiconTab::All => {
            let mut seen = HashSet::new();
            progress
                .mastered_items
                .iter()
                .chain(progress.learning_items.iter())
                .filter(|i| seen.insert(i.id.as_str()))
                .cloned()
                .collect()
        }
    };
    filter_by_text(&items, query)
}
