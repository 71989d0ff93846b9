//! Shared schema builders and helpers for the engine suites.

use formgraph::{FormContext, Schema, StateDefinition};
use serde_json::Value;

/// The three-step wizard used across suites:
/// step1 (w1) --NEXT--> step2 (w2) --NEXT--> step3 (w1), step1 --SKIP--> step3.
pub fn wizard() -> Schema {
    Schema::new("test-form", "step1")
        .state(
            StateDefinition::new("step1")
                .transition("NEXT", "step2")
                .transition("SKIP", "step3"),
        )
        .state(
            StateDefinition::new("step2")
                .weight(2.0)
                .transition("NEXT", "step3"),
        )
        .state(StateDefinition::new("step3"))
}

/// Single-entry context payload.
pub fn data(key: &str, value: Value) -> FormContext {
    let mut ctx = FormContext::new();
    ctx.insert(key.to_string(), value);
    ctx
}
