//! Observer registration, payloads, and emission order.

use std::sync::{Arc, Mutex};

use formgraph::{
    EngineEvent, EngineOptions, EventKind, FormEngine, MemoryStorage, StorageAdapter,
};
use serde_json::json;

use super::common::{data, wizard};

fn recording() -> (Arc<Mutex<Vec<String>>>, impl Fn(&EngineEvent) + Send + Sync + Clone) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let callback = move |event: &EngineEvent| {
        sink.lock().unwrap().push(event.kind().name().to_string());
    };
    (log, callback)
}

/// **Scenario**: stepChange carries from, to, and the merged context.
#[tokio::test]
async fn step_change_payload() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    engine.on(EventKind::StepChange, move |event| {
        if let EngineEvent::StepChange(change) = event {
            *sink.lock().unwrap() = Some(change.clone());
        }
    });

    engine
        .transition("NEXT", Some(data("name", json!("John"))))
        .await
        .unwrap();

    let change = seen.lock().unwrap().clone().unwrap();
    assert_eq!(change.from, "step1");
    assert_eq!(change.to, "step2");
    assert_eq!(change.context.get("name"), Some(&json!("John")));
}

/// **Scenario**: reaching a terminal state emits complete with the final
/// context, and the on_complete callback fires.
#[tokio::test]
async fn complete_fires_on_terminal_state() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let completed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&completed);
    let mut engine = FormEngine::new(
        EngineOptions::new(wizard()).on_complete(move |_| flag.store(true, Ordering::SeqCst)),
    )
    .unwrap();
    engine.start().await.unwrap();

    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    engine.on(EventKind::Complete, move |event| {
        if let EngineEvent::Complete { context } = event {
            *sink.lock().unwrap() = Some(context.clone());
        }
    });

    engine
        .transition("SKIP", Some(data("done", json!(true))))
        .await
        .unwrap();

    assert!(completed.load(Ordering::SeqCst));
    let context = seen.lock().unwrap().clone().unwrap();
    assert_eq!(context.get("done"), Some(&json!(true)));
}

/// **Scenario**: resuming emits resumed then started, in that order.
#[tokio::test]
async fn resume_emits_resumed_before_started() {
    let storage = Arc::new(MemoryStorage::new("wizard"));
    let mut first = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(Arc::clone(&storage) as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    first.start().await.unwrap();
    first.transition("NEXT", None).await.unwrap();

    let mut second = FormEngine::new(
        EngineOptions::new(wizard()).with_storage(storage as Arc<dyn StorageAdapter>),
    )
    .unwrap();
    let (log, callback) = recording();
    second.on(EventKind::Resumed, callback.clone());
    second.on(EventKind::Started, callback);
    second.start().await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["resumed", "started"]);
}

/// **Scenario**: updateContext emits contextUpdate with the merged context.
#[tokio::test]
async fn context_update_event() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    engine.on(EventKind::ContextUpdate, move |event| {
        if let EngineEvent::ContextUpdate { context } = event {
            *sink.lock().unwrap() = Some(context.clone());
        }
    });

    engine
        .update_context(data("email", json!("a@b.co")))
        .await
        .unwrap();
    let context = seen.lock().unwrap().clone().unwrap();
    assert_eq!(context.get("email"), Some(&json!("a@b.co")));
}

/// **Scenario**: off() stops delivery for that registration only; the other
/// listener keeps receiving.
#[tokio::test]
async fn off_removes_one_listener() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    let (log_a, callback_a) = recording();
    let (log_b, callback_b) = recording();
    let a = engine.on(EventKind::StepChange, callback_a);
    engine.on(EventKind::StepChange, callback_b);

    engine.transition("NEXT", None).await.unwrap();
    assert!(engine.off(a));
    engine.transition("NEXT", None).await.unwrap();

    assert_eq!(log_a.lock().unwrap().len(), 1);
    assert_eq!(log_b.lock().unwrap().len(), 2);
}

/// **Scenario**: a panicking observer does not block later observers or
/// fail the operation.
#[tokio::test]
async fn panicking_observer_is_isolated() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    engine.on(EventKind::StepChange, |_| panic!("observer bug"));
    let (log, callback) = recording();
    engine.on(EventKind::StepChange, callback);

    engine.transition("NEXT", None).await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["stepChange"]);
}

/// **Scenario**: reset emits the reset event and back() emits stepChange.
#[tokio::test]
async fn reset_and_back_events() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    let (log, callback) = recording();
    engine.on(EventKind::StepChange, callback.clone());
    engine.on(EventKind::Reset, callback);

    engine.transition("NEXT", None).await.unwrap();
    engine.back().await.unwrap();
    engine.reset().await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["stepChange", "stepChange", "reset"]
    );
}
