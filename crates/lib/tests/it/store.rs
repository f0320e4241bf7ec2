//! Tests for the ListStore trait and the InMemory backend.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use tandem::list::{ListId, Permission, UserId};
use tandem::store::{IdMinter, InMemory, ListStore};

/// Minter that replays a fixed sequence of ids, for collision tests.
struct SequenceMinter {
    ids: Mutex<VecDeque<String>>,
}

impl SequenceMinter {
    fn new(ids: &[&str]) -> Self {
        Self {
            ids: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl IdMinter for SequenceMinter {
    fn mint(&self) -> String {
        let mut ids = self.ids.lock().unwrap();
        match ids.len() {
            // Keep replaying the last id once the script runs out.
            1 => ids[0].clone(),
            _ => ids.pop_front().unwrap(),
        }
    }
}

fn owner() -> UserId {
    UserId::from("alice")
}

#[tokio::test]
async fn create_persists_an_empty_list() {
    let store = InMemory::new();
    let list = store
        .create(owner(), "Groceries".to_string(), Utc::now())
        .await
        .unwrap();

    assert_eq!(list.name, "Groceries");
    assert_eq!(list.owner_id, owner());
    assert!(list.items.is_empty());
    assert!(list.collaborators().is_empty());
    assert!(!list.archived);
    assert!(!list.pinned);

    let fetched = store.get(&list.list_id).await.unwrap();
    assert_eq!(fetched, list);
}

#[tokio::test]
async fn create_retries_silently_on_id_collision() {
    let store = InMemory::with_minter(Box::new(SequenceMinter::new(&["taken", "taken", "fresh"])));

    let first = store
        .create(owner(), "First".to_string(), Utc::now())
        .await
        .unwrap();
    assert_eq!(first.list_id, ListId::from("taken"));

    // The second create collides once, then lands on the next candidate.
    let second = store
        .create(owner(), "Second".to_string(), Utc::now())
        .await
        .unwrap();
    assert_eq!(second.list_id, ListId::from("fresh"));
}

#[tokio::test]
async fn create_surfaces_exhaustion_as_unclassified() {
    let store = InMemory::with_minter(Box::new(SequenceMinter::new(&["only"])));
    store
        .create(owner(), "First".to_string(), Utc::now())
        .await
        .unwrap();

    let err = store
        .create(owner(), "Second".to_string(), Utc::now())
        .await
        .unwrap_err();
    assert!(err.is_unclassified());
}

#[tokio::test]
async fn get_unknown_list_is_not_found() {
    let store = InMemory::new();
    let err = store.get(&ListId::from("missing")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn update_applies_one_whole_document_write() {
    let store = InMemory::new();
    let list = store
        .create(owner(), "Groceries".to_string(), Utc::now())
        .await
        .unwrap();

    let updated = store
        .update(
            &list.list_id,
            Box::new(|list| {
                list.name = "Errands".to_string();
                Ok(())
            }),
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Errands");
    assert_eq!(store.get(&list.list_id).await.unwrap().name, "Errands");
}

#[tokio::test]
async fn failed_mutator_aborts_the_write() {
    let store = InMemory::new();
    let list = store
        .create(owner(), "Groceries".to_string(), Utc::now())
        .await
        .unwrap();

    let err = store
        .update(
            &list.list_id,
            Box::new(|list| {
                list.name = "Halfway".to_string();
                Err(tandem::list::ListError::ItemNotFound {
                    item: "phantom".into(),
                }
                .into())
            }),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    // Nothing was written.
    assert_eq!(store.get(&list.list_id).await.unwrap().name, "Groceries");
}

#[tokio::test]
async fn delete_is_idempotent_from_the_second_call() {
    let store = InMemory::new();
    let list = store
        .create(owner(), "Groceries".to_string(), Utc::now())
        .await
        .unwrap();

    store.delete(&list.list_id).await.unwrap();
    let err = store.delete(&list.list_id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn visible_to_covers_ownership_and_collaboration() {
    let store = InMemory::new();
    let mine = store
        .create(owner(), "Mine".to_string(), Utc::now())
        .await
        .unwrap();
    let shared = store
        .create(UserId::from("bob"), "Shared".to_string(), Utc::now())
        .await
        .unwrap();
    store
        .create(UserId::from("bob"), "Private".to_string(), Utc::now())
        .await
        .unwrap();

    store
        .update(
            &shared.list_id,
            Box::new(|list| {
                list.add_collaborator(UserId::from("alice"), Permission::View)?;
                Ok(())
            }),
        )
        .await
        .unwrap();

    let mut visible: Vec<String> = store
        .visible_to(&owner())
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    visible.sort();
    assert_eq!(visible, ["Mine", "Shared"]);
    assert_eq!(store.get(&mine.list_id).await.unwrap().name, "Mine");
}

#[tokio::test]
async fn whole_state_survives_a_save_load_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tandem.json");

    let store = InMemory::new();
    let list = store
        .create(owner(), "Groceries".to_string(), Utc::now())
        .await
        .unwrap();
    store
        .update(
            &list.list_id,
            Box::new(|list| {
                list.add_collaborator(UserId::from("bob"), Permission::Edit)?;
                list.items.push(tandem::list::Item::new("Milk", 0));
                Ok(())
            }),
        )
        .await
        .unwrap();

    store.save_to_file(&path).unwrap();

    let reloaded = InMemory::load_from_file(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    let restored = reloaded.get(&list.list_id).await.unwrap();
    assert_eq!(restored.items.len(), 1);
    assert_eq!(
        restored.permission_of(&UserId::from("bob")),
        Some(Permission::Edit)
    );
}

#[tokio::test]
async fn loading_a_missing_file_yields_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemory::load_from_file(dir.path().join("absent.json")).unwrap();
    assert!(store.is_empty());
}
