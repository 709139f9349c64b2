//! Every change to [`UserProgress`] goes through [`apply_action`], which maps the
//! previous state and an action to the next state without touching the input.

use crate::{CoreError, ItemId, Level, UserProgress, VocabItem};
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub enum ProgressAction {
    /// Fold a finished quiz into the lexicon.
    CompleteQuiz {
        mastered: Vec<VocabItem>,
        to_study: Vec<VocabItem>,
    },
    /// One card of a library review.
    Review { item: VocabItem, correct: bool },
    ToggleMastery { id: ItemId },
    AddWord { item: VocabItem },
    Delete { id: ItemId },
}

pub fn apply_action(prev: &UserProgress, action: ProgressAction) -> Result<UserProgress, CoreError> {
    let mut next = prev.clone();
    match action {
        ProgressAction::CompleteQuiz { mastered, to_study } => {
            let mut newly = Vec::new();
            for item in mastered {
                let already = next.mastered_items.iter().any(|m| m.id == item.id || m.same_entry(&item));
                if !already && !newly.iter().any(|n: &VocabItem| n.same_entry(&item)) {
                    newly.push(item);
                }
            }
            let newly_ids: HashSet<&str> = newly.iter().map(|i| i.id.as_str()).collect();
            next.learning_items.retain(|i| !newly_ids.contains(i.id.as_str()));
            for item in &newly {
                bump(&mut next, item.level);
            }
            next.mastered_items.extend(newly);

            for item in to_study {
                if next.mastered_items.iter().any(|m| m.id == item.id || m.same_entry(&item)) {
                    continue;
                }
                next.learning_items.retain(|i| i.id != item.id && !i.same_entry(&item));
                next.learning_items.push(item);
            }
        }
        ProgressAction::Review { item, correct } => {
            let in_mastered = next.is_mastered(&item.id);
            if correct {
                next.learning_items.retain(|i| i.id != item.id);
                if !in_mastered {
                    bump(&mut next, item.level);
                    next.mastered_items.insert(0, item);
                }
            } else if in_mastered {
                next.mastered_items.retain(|i| i.id != item.id);
                drop_count(&mut next, item.level);
                next.learning_items.retain(|i| i.id != item.id);
                next.learning_items.insert(0, item);
            } else if !next.is_learning(&item.id) {
                next.learning_items.insert(0, item);
            }
            // Incorrect on an item that is already learning leaves state as is.
        }
        ProgressAction::ToggleMastery { id } => {
            if let Some(pos) = next.mastered_items.iter().position(|i| i.id == id) {
                let item = next.mastered_items.remove(pos);
                drop_count(&mut next, item.level);
                next.learning_items.insert(0, item);
            } else if let Some(pos) = next.learning_items.iter().position(|i| i.id == id) {
                let item = next.learning_items.remove(pos);
                bump(&mut next, item.level);
                next.mastered_items.insert(0, item);
            } else {
                return Err(CoreError::NotFound("item"));
            }
        }
        ProgressAction::AddWord { item } => {
            if next.contains_entry(&item) {
                return Err(CoreError::Conflict(format!(
                    "this {} is already in your lexicon",
                    item.word_type
                )));
            }
            bump(&mut next, item.level);
            next.mastered_items.insert(0, item);
        }
        ProgressAction::Delete { id } => {
            let Some(item) = next.find(&id).cloned() else {
                return Err(CoreError::NotFound("item"));
            };
            if next.is_mastered(&id) {
                drop_count(&mut next, item.level);
            }
            next.mastered_items.retain(|i| i.id != id);
            next.learning_items.retain(|i| i.id != id);
        }
    }
    Ok(next)
}

fn bump(p: &mut UserProgress, level: Level) {
    *p.level_stats.entry(level).or_insert(0) += 1;
}

fn drop_count(p: &mut UserProgress, level: Level) {
    let c = p.level_stats.entry(level).or_insert(0);
    *c = c.saturating_sub(1);
}
