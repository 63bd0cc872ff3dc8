use super::*;
use crate::workout::{ExerciseCategory, ExerciseTemplate, EquipmentType, WeightUnit, WorkoutSession};

fn session(id: &str, date: &str) -> WorkoutSession {
    WorkoutSession { id: id.into(), date: date.into(), exercises: vec![], total_duration: None, notes: None }
}

async fn open_sessions(backend: Arc<MemoryBlobStore>) -> Collection<WorkoutSession> {
    Collection::open(SESSIONS_KEY, backend).await.unwrap()
}

#[tokio::test]
async fn open_missing_blob_is_empty() {
    let col = open_sessions(Arc::new(MemoryBlobStore::new())).await;
    assert!(col.list().await.is_empty());
}

#[tokio::test]
async fn open_malformed_blob_is_empty_and_left_in_place() {
    let backend = Arc::new(MemoryBlobStore::new());
    backend.put(SESSIONS_KEY, "{not json");
    let col = open_sessions(backend.clone()).await;
    assert!(col.list().await.is_empty());
    assert_eq!(backend.load(SESSIONS_KEY).await.unwrap().as_deref(), Some("{not json"));
}

#[tokio::test]
async fn insert_writes_through_to_backend() {
    let backend = Arc::new(MemoryBlobStore::new());
    let col = open_sessions(backend.clone()).await;
    col.insert(session("a", "2026-10-01")).await.unwrap();

    let body = backend.load(SESSIONS_KEY).await.unwrap().unwrap();
    let stored: Vec<WorkoutSession> = decode(&body).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "a");

    // A fresh collection over the same backend sees the record.
    let reopened = open_sessions(backend).await;
    assert_eq!(reopened.get("a").await.unwrap().date, "2026-10-01");
}

#[tokio::test]
async fn encode_decode_preserves_order() {
    let records = vec![session("c", "2026-10-03"), session("a", "2026-10-01"), session("b", "2026-10-02")];
    let body = encode(records.as_slice()).unwrap();
    let back: Vec<WorkoutSession> = decode(&body).unwrap();
    assert_eq!(back, records);
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let col = open_sessions(Arc::new(MemoryBlobStore::new())).await;
    let err = col.update("nope", |_| {}).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == "nope"));
}

#[tokio::test]
async fn remove_takes_exactly_one_record() {
    let col = open_sessions(Arc::new(MemoryBlobStore::new())).await;
    col.insert(session("a", "d1")).await.unwrap();
    col.insert(session("b", "d2")).await.unwrap();
    col.insert(session("c", "d3")).await.unwrap();

    let removed = col.remove("b").await.unwrap();
    assert_eq!(removed.id, "b");
    let ids: Vec<String> = col.list().await.into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(col.get("b").await.is_none());
    assert!(matches!(col.remove("b").await.unwrap_err(), StoreError::NotFound(_)));
}

#[tokio::test]
async fn rejected_write_leaves_memory_untouched() {
    let backend = Arc::new(MemoryBlobStore::new());
    let col = open_sessions(backend.clone()).await;
    col.insert(session("a", "d1")).await.unwrap();

    backend.set_reject_writes(true);
    let err = col.insert(session("b", "d2")).await.unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    let err = col.update("a", |s| s.date = "changed".into()).await.unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert!(matches!(col.remove("a").await.unwrap_err(), StoreError::Storage(_)));

    let list = col.list().await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].date, "d1");
}

#[tokio::test]
async fn concurrent_inserts_all_land() {
    let backend = Arc::new(MemoryBlobStore::new());
    let col = Arc::new(open_sessions(backend.clone()).await);
    let mut handles = Vec::new();
    for i in 0..16 {
        let col = col.clone();
        handles.push(tokio::spawn(async move { col.insert(session(&format!("s{i}"), "d")).await }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }
    assert_eq!(col.list().await.len(), 16);
    let body = backend.load(SESSIONS_KEY).await.unwrap().unwrap();
    assert_eq!(decode::<WorkoutSession>(&body).unwrap().len(), 16);
}

#[tokio::test]
async fn snapshot_matches_backend_blob() {
    let backend = Arc::new(MemoryBlobStore::new());
    let col: Collection<ExerciseTemplate> = Collection::open(TEMPLATES_KEY, backend.clone()).await.unwrap();
    col.insert(ExerciseTemplate {
        id: "t1".into(),
        name: "Squat".into(),
        category: ExerciseCategory::Legs,
        equipment_type: EquipmentType::Barbell,
        default_weight_unit: WeightUnit::Kg,
        notes: None,
        created_at: "2026-10-19T00:00:00.000Z".into(),
        last_used_at: None,
    })
    .await
    .unwrap();
    assert_eq!(col.snapshot().await.unwrap(), backend.load(TEMPLATES_KEY).await.unwrap().unwrap());
}

#[test]
fn store_error_codes() {
    assert_eq!(StoreError::NotFound("x".into()).error_code(), "E_NOT_FOUND");
    assert_eq!(StoreError::Storage("x".into()).error_code(), "E_STORAGE");
}
