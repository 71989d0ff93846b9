//! Weighted progress across forward and branching walks.

use formgraph::{EngineOptions, FormEngine};

use super::common::wizard;

/// **Scenario**: progress before any transition is exactly 0.
#[tokio::test]
async fn progress_starts_at_zero() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();
    assert_eq!(engine.progress(), 0.0);
}

/// **Scenario**: progress is monotonically non-decreasing across a strictly
/// forward walk that never revisits a state.
#[tokio::test]
async fn progress_monotonic_on_forward_walk() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    let p0 = engine.progress();
    engine.transition("NEXT", None).await.unwrap();
    let p1 = engine.progress();
    engine.transition("NEXT", None).await.unwrap();
    let p2 = engine.progress();

    assert!(p0 <= p1 && p1 <= p2, "{} <= {} <= {}", p0, p1, p2);
    assert_eq!(p0, 0.0);
    // Heaviest path is 1 + 2 + 1 = 4: step1 completed = 25%, then 75%.
    assert_eq!(p1, 25.0);
    assert_eq!(p2, 75.0);
}

/// **Scenario**: the skip branch completes with less accumulated weight than
/// the full walk; both stay in [0, 100] here.
#[tokio::test]
async fn progress_reflects_chosen_branch() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    engine.transition("SKIP", None).await.unwrap();
    assert_eq!(engine.progress(), 25.0);
}

/// **Scenario**: back() removes the state being left from the numerator.
/// Leaving the never-completed terminal changes nothing; stepping back off
/// step2 gives its weight up.
#[tokio::test]
async fn back_lowers_progress() {
    let mut engine = FormEngine::new(EngineOptions::new(wizard())).unwrap();
    engine.start().await.unwrap();

    engine.transition("NEXT", None).await.unwrap();
    engine.transition("NEXT", None).await.unwrap();
    assert_eq!(engine.progress(), 75.0);

    engine.back().await.unwrap();
    assert_eq!(engine.progress(), 75.0);

    engine.back().await.unwrap();
    assert_eq!(engine.progress(), 25.0);
}
