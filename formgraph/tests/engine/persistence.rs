//! Resume, round-trip, and storage failure handling.

use std::sync::Arc;

use async_trait::async_trait;
use formgraph::{
    EngineError, EngineOptions, EngineState, EventKind, FormEngine, MemoryStorage, StorageAdapter,
    StorageError,
};
use serde_json::json;

use super::common::{data, wizard};

/// Adapter that fails every operation; load failures must be absorbed,
/// save/clear failures must propagate.
struct FailingStorage;

#[async_trait]
impl StorageAdapter for FailingStorage {
    async fn save(&self, _state: &EngineState) -> Result<(), StorageError> {
        Err(StorageError::Backend("save refused".into()))
    }

    async fn load(&self) -> Result<Option<EngineState>, StorageError> {
        Err(StorageError::Backend("load refused".into()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::Backend("clear refused".into()))
    }
}

/// **Scenario**: a second engine on the same storage key resumes the saved
/// session; currentState, context, history, and completed steps round-trip.
#[tokio::test]
async fn resume_round_trips_state() {
    let storage = Arc::new(MemoryStorage::new("wizard"));

    let mut first = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::clone(&storage) as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    first.start().await.unwrap();
    first
        .transition("NEXT", Some(data("name", json!("John"))))
        .await
        .unwrap();
    let saved = first.state().clone();

    let mut second = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::clone(&storage) as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    second.start().await.unwrap();

    assert_eq!(second.state(), &saved);
    assert_eq!(second.current_state(), "step2");
    assert_eq!(second.context().get("name"), Some(&json!("John")));
    assert_eq!(second.state().history, vec!["step1".to_string()]);
}

/// **Scenario**: start with no saved state stays freshly initialized and
/// does not emit Resumed.
#[tokio::test]
async fn start_without_saved_state_is_fresh() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let storage = Arc::new(MemoryStorage::new("empty"));
    let mut engine = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(storage as Arc<dyn StorageAdapter>),
    )
    .unwrap();

    let resumed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&resumed);
    engine.on(EventKind::Resumed, move |_| {
        flag.store(true, Ordering::SeqCst);
    });

    engine.start().await.unwrap();
    assert_eq!(engine.current_state(), "step1");
    assert!(!resumed.load(Ordering::SeqCst));
}

/// **Scenario**: a load failure is swallowed — start succeeds with a fresh
/// session.
#[tokio::test]
async fn load_failure_is_treated_as_no_saved_state() {
    let mut engine = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::new(FailingStorage)),
    )
    .unwrap();

    engine.start().await.unwrap();
    assert_eq!(engine.current_state(), "step1");
}

/// **Scenario**: a save failure during transition propagates as a storage
/// error.
#[tokio::test]
async fn save_failure_propagates() {
    let mut engine = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::new(FailingStorage)),
    )
    .unwrap();
    engine.start().await.unwrap();

    let result = engine.transition("NEXT", None).await;
    assert!(matches!(result, Err(EngineError::Storage(_))));
}

/// **Scenario**: reset clears the persisted state, so the next start is
/// fresh.
#[tokio::test]
async fn reset_clears_persisted_state() {
    let storage = Arc::new(MemoryStorage::new("wizard"));

    let mut engine = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::clone(&storage) as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    engine.start().await.unwrap();
    engine.transition("NEXT", None).await.unwrap();
    assert!(storage.load().await.unwrap().is_some());

    engine.reset().await.unwrap();
    assert!(storage.load().await.unwrap().is_none());
    assert_eq!(engine.current_state(), "step1");
}

/// **Scenario**: a snapshot naming a state the schema does not know is
/// discarded instead of resuming into an invalid session.
#[tokio::test]
async fn stale_snapshot_is_discarded() {
    let storage = Arc::new(MemoryStorage::new("wizard"));
    let stale = EngineState {
        current_state: "ghost".into(),
        context: formgraph::FormContext::new(),
        history: vec![],
        completed_steps: Default::default(),
    };
    storage.save(&stale).await.unwrap();

    let mut engine = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(storage as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    engine.start().await.unwrap();
    assert_eq!(engine.current_state(), "step1");
}

/// **Scenario**: two engines sharing a key are last-write-wins.
#[tokio::test]
async fn shared_key_is_last_write_wins() {
    let storage = Arc::new(MemoryStorage::new("shared"));

    let mut a = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::clone(&storage) as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    let mut b = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::clone(&storage) as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    a.start().await.unwrap();
    b.start().await.unwrap();

    a.transition("NEXT", None).await.unwrap();
    b.transition("SKIP", None).await.unwrap();

    let loaded = storage.load().await.unwrap().unwrap();
    assert_eq!(loaded.current_state, "step3");
}
