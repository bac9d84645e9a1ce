
use std::sync::Arc;

use chrono::NaiveDate;

use checkup_planner::advisor::CheckupAdvisor;
use checkup_planner::mock_behaviour::MockBehaviour;
use checkup_planner::store::MemoryStore;
use checkup_planner::tasks::{TaskStore, TASKS_KEY};
use checkup_planner::traits::KeyValueStore;
use checkup_planner::{Planner, StoreError};

fn date(text: &str) -> NaiveDate {
    text.parse().unwrap()
}

#[tokio::test]
async fn notes_survive_a_restart() {
    let _ = env_logger::builder().is_test(true).try_init();

    let storage = MemoryStore::new();

    let mut store = TaskStore::new(storage.clone());
    store.load().await.unwrap();
    store.set_note(date("2024-02-29"), "Cardiologist appointment").await.unwrap();
    store.set_note(date("2024-03-15"), "Renew prescription").await.unwrap();

    // Simulated restart: a brand new store over the same household storage
    let mut restarted = TaskStore::new(storage);
    restarted.load().await.unwrap();

    assert_eq!(restarted.note(date("2024-02-29")), Some("Cardiologist appointment"));
    assert_eq!(restarted.note(date("2024-03-15")), Some("Renew prescription"));
    assert_eq!(restarted.markers().len(), 2);
}

#[tokio::test]
async fn failed_save_is_surfaced_but_memory_keeps_the_edit() {
    let _ = env_logger::builder().is_test(true).try_init();

    let storage = MemoryStore::new();
    storage.set_mock_behaviour(MockBehaviour{
        set_behaviour: (0, 1),
        ..MockBehaviour::default()
    });

    let mut store = TaskStore::new(storage.clone());
    let saved = store.set_note(date("2024-06-10"), "Dentist").await;

    // The error is surfaced, and the in-memory state is ahead of the durable state
    assert!(matches!(saved, Err(StoreError::Persistence(_))));
    assert_eq!(store.note(date("2024-06-10")), Some("Dentist"));
    assert_eq!(storage.get(TASKS_KEY).await.unwrap(), None);

    // The next successful save persists the whole mapping, converging both states
    store.set_note(date("2024-06-11"), "Pharmacy").await.unwrap();

    let mut restarted = TaskStore::new(storage);
    restarted.load().await.unwrap();
    assert_eq!(restarted.note(date("2024-06-10")), Some("Dentist"));
    assert_eq!(restarted.note(date("2024-06-11")), Some("Pharmacy"));
}

#[tokio::test]
async fn corrupt_storage_degrades_to_an_empty_mapping() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut storage = MemoryStore::new();
    storage.set(TASKS_KEY, "{ this is not json").await.unwrap();

    let mut store = TaskStore::new(storage);
    let loaded = store.load().await;

    assert!(matches!(loaded, Err(StoreError::Deserialization(_))));
    assert!(store.markers().is_empty());
    assert_eq!(store.note(date("2024-01-01")), None);
}

#[tokio::test]
async fn planner_keeps_running_over_corrupt_storage() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut storage = MemoryStore::new();
    storage.set(TASKS_KEY, "[[[").await.unwrap();

    let advisor = CheckupAdvisor::new(Arc::new(mocks::CannedSource{ answer: Ok(None) }));
    let mut planner = Planner::new(TaskStore::new(storage), advisor);

    // Startup logs the problem and proceeds empty; editing works as usual afterwards
    planner.start().await;
    assert!(planner.markers().is_empty());

    planner.save_note(date("2024-09-01"), "Follow-up visit").await.unwrap();
    assert_eq!(planner.note(date("2024-09-01")), Some("Follow-up visit"));
    assert!(planner.markers().contains_key(&date("2024-09-01")));
}
