use deutschpro_core::{ChatMessage, Level, ProgressAction, ProgressStore, Role, VocabItem, WordType};
use deutschpro_json::JsonStore;
use std::fs;

#[tokio::test]
async fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let item = VocabItem::new("Haus", "house", WordType::Noun, Level::A1);
    {
        let store = JsonStore::open_in(dir.path()).await.unwrap();
        assert_eq!(store.load_progress().await.unwrap().total_items(), 0);
        store.dispatch(ProgressAction::AddWord { item: item.clone() }).await.unwrap();
        store
            .save_chat(&[ChatMessage::new(Role::Model, "Hallo!")])
            .await
            .unwrap();
    }

    let store = JsonStore::open_in(dir.path()).await.unwrap();
    let p = store.load_progress().await.unwrap();
    assert_eq!(p.mastered_items, vec![item]);
    assert_eq!(p.mastered_count(Level::A1), 1);
    let chat = store.load_chat().await.unwrap();
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].text, "Hallo!");
}

#[tokio::test]
async fn file_carries_version_and_progress() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open_in(dir.path()).await.unwrap();
    store
        .dispatch(ProgressAction::AddWord {
            item: VocabItem::new("gehen", "to go", WordType::Verb, Level::A1),
        })
        .await
        .unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["version"], 1);
    assert_eq!(v["progress"]["masteredItems"][0]["word"], "gehen");
    assert_eq!(v["progress"]["levelStats"]["A1"], 1);
}

#[tokio::test]
async fn rejected_action_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open_in(dir.path()).await.unwrap();
    let err = store
        .dispatch(ProgressAction::Delete { id: "missing".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, deutschpro_core::CoreError::NotFound(_)));
    assert_eq!(store.load_progress().await.unwrap().total_items(), 0);
}

#[tokio::test]
async fn backups_are_rotated() {
    let dir = tempfile::tempdir().unwrap();
    let (file, backups) = deutschpro_json::paths::store_files_in(dir.path());
    let store = JsonStore::open_with(file, backups.clone(), 2).await.unwrap();
    for w in ["eins", "zwei", "drei", "vier"] {
        store
            .dispatch(ProgressAction::AddWord {
                item: VocabItem::new(w, w, WordType::Noun, Level::A1),
            })
            .await
            .unwrap();
    }
    let n = fs::read_dir(&backups).unwrap().count();
    assert!(n <= 2, "{n} backups kept");
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (file, _) = deutschpro_json::paths::store_files_in(dir.path());
    fs::write(&file, "{ not json").unwrap();
    assert!(JsonStore::open_in(dir.path()).await.is_err());
}
