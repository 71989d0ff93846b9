//! Mutable per-session engine state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::{FormContext, Schema};

/// One form session's mutable state.
///
/// Mutated exclusively by the engine's transition/back/update/reset
/// operations. Serializes for persistence; `completed_steps` is a set in
/// memory and an ordered sequence on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Name of the active state; always a key of the schema's state map.
    pub current_state: String,
    /// Accumulated form data, shallow-merged and never rolled back.
    pub context: FormContext,
    /// Previously-visited states, pushed on forward transition and popped on
    /// back.
    pub history: Vec<String>,
    /// States the session has passed through; drives weighted progress.
    /// Re-adding is idempotent.
    pub completed_steps: BTreeSet<String>,
}

impl EngineState {
    /// The state a session starts in: the schema's initial state and default
    /// context, nothing visited.
    pub(crate) fn fresh(schema: &Schema) -> Self {
        Self {
            current_state: schema.initial.clone(),
            context: schema.context.clone(),
            history: Vec::new(),
            completed_steps: BTreeSet::new(),
        }
    }
}
