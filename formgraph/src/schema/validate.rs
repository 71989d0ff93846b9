//! Load-time schema validation.
//!
//! Runs from `Schema::from_json` and at engine construction, before any
//! traversal: a schema that passes cannot produce a dangling target or an
//! uncompilable pattern rule at runtime. Unreachable states are reported as
//! a warning, not an error.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::logging;
use crate::validator::ValidationRule;

use super::definition::Schema;

/// Rejection from the load-time validation pass.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    /// The JSON file format did not parse.
    #[error("schema parse failed: {0}")]
    Parse(String),

    /// `initial` does not name a state.
    #[error("initial state not found: {0}")]
    UnknownInitial(String),

    /// A state's key in `states` differs from its `id` field.
    #[error("state key {key:?} does not match its id {id:?}")]
    IdMismatch { key: String, id: String },

    /// A transition references a state that does not exist.
    #[error("transition target not found: {target} (state: {state}, event: {event})")]
    DanglingTarget {
        state: String,
        event: String,
        target: String,
    },

    /// Progress weights must be positive.
    #[error("state {state} has non-positive weight: {weight}")]
    NonPositiveWeight { state: String, weight: f64 },

    /// A `pattern` validation rule does not compile as a regex.
    #[error("state {state} has an invalid pattern rule: {pattern}")]
    InvalidPattern { state: String, pattern: String },

    /// A setter addressed a state that does not exist.
    #[error("state not found: {0}")]
    UnknownState(String),

    /// A setter addressed an event with no transition defined.
    #[error("no transition for event {event} in state {state}")]
    UnknownTransition { state: String, event: String },
}

impl Schema {
    /// Validates the graph definition. Checks, in order: the initial state
    /// exists, every key matches its definition's id, every transition target
    /// exists, every weight is positive, every pattern rule compiles. States
    /// unreachable from `initial` are logged as a warning.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if !self.states.contains_key(&self.initial) {
            return Err(SchemaError::UnknownInitial(self.initial.clone()));
        }

        for (key, definition) in &self.states {
            if key != &definition.id {
                return Err(SchemaError::IdMismatch {
                    key: key.clone(),
                    id: definition.id.clone(),
                });
            }
            if definition.meta.weight <= 0.0 {
                return Err(SchemaError::NonPositiveWeight {
                    state: key.clone(),
                    weight: definition.meta.weight,
                });
            }
            for (event, transition) in &definition.on {
                if !self.states.contains_key(&transition.target) {
                    return Err(SchemaError::DanglingTarget {
                        state: key.clone(),
                        event: event.clone(),
                        target: transition.target.clone(),
                    });
                }
            }
            for rule in &definition.meta.validation {
                if let ValidationRule::Pattern { value, .. } = rule {
                    if regex::Regex::new(value).is_err() {
                        return Err(SchemaError::InvalidPattern {
                            state: key.clone(),
                            pattern: value.clone(),
                        });
                    }
                }
            }
        }

        let unreachable = self.unreachable_states();
        if !unreachable.is_empty() {
            logging::log_unreachable_states(&self.id, &unreachable);
        }

        Ok(())
    }

    /// States with no path from `initial`, in name order.
    fn unreachable_states(&self) -> Vec<String> {
        let mut reachable = BTreeSet::new();
        let mut frontier = vec![self.initial.clone()];
        while let Some(name) = frontier.pop() {
            if !reachable.insert(name.clone()) {
                continue;
            }
            if let Some(definition) = self.states.get(&name) {
                for transition in definition.on.values() {
                    frontier.push(transition.target.clone());
                }
            }
        }
        self.states
            .keys()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect()
    }
}
