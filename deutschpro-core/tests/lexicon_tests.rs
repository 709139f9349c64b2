use deutschpro_core::memory::MemoryStore;
use deutschpro_core::{
    filter_by_text, filter_by_type, level_summaries, lexicon_view, Level, LexiconTab, ProgressAction,
    ProgressStore, QuizSession, Snapshot, UserProgress, Verdict, VocabItem, WordType,
};

fn item(word: &str, translation: &str, level: Level) -> VocabItem {
    VocabItem::new(word, translation, WordType::Noun, level)
}

#[test]
fn text_filter_matches_word_or_translation() {
    let v = vec![item("Haus", "house", Level::A1), item("Hund", "dog", Level::A1)];
    assert_eq!(filter_by_text(&v, "HAU").len(), 1);
    assert_eq!(filter_by_text(&v, "dog")[0].word, "Hund");
    assert_eq!(filter_by_text(&v, "  ").len(), 2);
}

#[test]
fn type_filter_keeps_one_part_of_speech() {
    let v = vec![
        item("Haus", "house", Level::A1),
        VocabItem::new("gehen", "to go", WordType::Verb, Level::A1),
        VocabItem::new("mit", "with", WordType::Preposition, Level::A1),
    ];
    let verbs = filter_by_type(&v, WordType::Verb);
    assert_eq!(verbs.len(), 1);
    assert_eq!(verbs[0].word, "gehen");
    assert!(filter_by_type(&v, WordType::Adverb).is_empty());
}

#[test]
fn all_tab_lists_each_id_once() {
    let a = item("Haus", "house", Level::A1);
    let b = item("Hund", "dog", Level::A1);
    let mut p = UserProgress::default();
    p.mastered_items.push(a.clone());
    p.learning_items.push(b);
    p.learning_items.push(a);
    assert_eq!(lexicon_view(&p, LexiconTab::All, "").len(), 2);
    assert_eq!(lexicon_view(&p, LexiconTab::Learning, "").len(), 2);
    assert_eq!(lexicon_view(&p, LexiconTab::Mastered, "hund").len(), 0);
}

#[test]
fn level_summary_caps_at_hundred() {
    let mut p = UserProgress::default();
    p.level_stats.insert(Level::A1, 500);
    p.level_stats.insert(Level::C1, 9000);
    let s = level_summaries(&p);
    assert_eq!(s.len(), 6);
    assert_eq!(s[0].percent(), 50.0);
    assert_eq!(s[4].target, 3000);
    assert_eq!(s[4].percent(), 100.0);
}

#[test]
fn quiz_session_partitions_answers() {
    let items = vec![item("a", "1", Level::B2), item("b", "2", Level::B2), item("c", "3", Level::B2)];
    let mut s = QuizSession::new(Level::B2, items);
    assert!(s.answer(Verdict::Mastered));
    assert!(s.answer(Verdict::StillLearning));
    assert_eq!(s.current().map(|i| i.word.as_str()), Some("c"));
    assert!(s.answer(Verdict::Mastered));
    assert!(s.is_complete());
    assert!(!s.answer(Verdict::Mastered));
    let r = s.into_results();
    assert_eq!(r.mastered.len(), 2);
    assert_eq!(r.to_study.len(), 1);
}

#[test]
fn snapshot_round_trip_and_version_check() {
    let mut p = UserProgress::default();
    p.mastered_items.push(item("Haus", "house", Level::A1));
    p.level_stats.insert(Level::A1, 1);
    let json = Snapshot::new(p.clone(), vec![]).to_json().unwrap();
    assert!(json.contains("\"masteredItems\""));
    assert!(json.contains("\"levelStats\""));
    let back = Snapshot::from_json(&json).unwrap();
    assert_eq!(back.progress, p);

    let future = json.replacen("\"version\": 1", "\"version\": 99", 1);
    assert!(Snapshot::from_json(&future).is_err());
    assert!(Snapshot::from_json("{}").is_err());
}

#[test]
fn progress_json_uses_camel_case_and_type_key() {
    let mut i = item("Haus", "house", Level::A1);
    i.example_translation = "The house.".into();
    let v = serde_json::to_value(&i).unwrap();
    assert_eq!(v["type"], "noun");
    assert_eq!(v["level"], "A1");
    assert_eq!(v["exampleTranslation"], "The house.");
    assert!(v.get("gender").is_none());
}

#[tokio::test]
async fn memory_store_applies_actions_atomically() {
    let store = MemoryStore::new();
    let a = item("Wetter", "weather", Level::A2);
    let p = store.dispatch(ProgressAction::AddWord { item: a.clone() }).await.unwrap();
    assert_eq!(p.mastered_count(Level::A2), 1);

    // a rejected action leaves the stored state alone
    assert!(store.dispatch(ProgressAction::AddWord { item: a.clone() }).await.is_err());
    assert_eq!(store.load_progress().await.unwrap(), p);

    store.dispatch(ProgressAction::Delete { id: a.id }).await.unwrap();
    assert_eq!(store.load_progress().await.unwrap().total_items(), 0);
}
