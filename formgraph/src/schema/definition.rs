//! Schema types: the immutable graph definition supplied by the caller.
//!
//! A `Schema` maps state names to `StateDefinition`s; each state carries a
//! transition table keyed by event name. Deserializes from the JSON file
//! format `{id, initial, states: {name: {id, on?, meta?}}, context?}`.
//! Transition guards are code, not data: attach them with
//! [`Schema::set_condition`] after loading, or with
//! [`StateDefinition::transition_if`] when building in code.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::validator::ValidationRule;

use super::validate::SchemaError;

/// Accumulated form data: field name to JSON value, shallow-merged across the
/// session and never rolled back.
pub type FormContext = serde_json::Map<String, Value>;

/// Pure predicate over the context deciding a transition's eligibility.
pub type Condition = Arc<dyn Fn(&FormContext) -> bool + Send + Sync>;

fn default_weight() -> f64 {
    1.0
}

/// Per-state metadata: progress weight and validation rules applied when
/// leaving the state.
#[derive(Clone, Debug, Deserialize)]
pub struct StateMeta {
    /// Positive weight used for progress estimation.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Ordered rules evaluated against the context field named after the
    /// owning state.
    #[serde(default)]
    pub validation: Vec<ValidationRule>,
}

impl Default for StateMeta {
    fn default() -> Self {
        Self {
            weight: default_weight(),
            validation: Vec::new(),
        }
    }
}

/// A labeled edge to a target state, optionally guarded by a condition.
///
/// Deserializes from either a bare target name (`"step2"`) or an object
/// (`{"target": "step2"}`). The guard itself is never part of the wire
/// format.
#[derive(Clone)]
pub struct Transition {
    pub target: String,
    pub cond: Option<Condition>,
}

impl Transition {
    /// Unconditional transition to `target`.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cond: None,
        }
    }

    /// Guarded transition: eligible only while `cond(context)` holds.
    pub fn to_if(
        target: impl Into<String>,
        cond: impl Fn(&FormContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            target: target.into(),
            cond: Some(Arc::new(cond)),
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("cond", &self.cond.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl<'de> Deserialize<'de> for Transition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Target(String),
            Conditional { target: String },
        }

        let target = match Raw::deserialize(deserializer)? {
            Raw::Target(target) | Raw::Conditional { target } => target,
        };
        Ok(Transition { target, cond: None })
    }
}

/// One named node in the form graph.
///
/// An empty transition table marks the state terminal: reaching it signals
/// form completion.
#[derive(Clone, Debug, Deserialize)]
pub struct StateDefinition {
    /// Must match the state's key in `Schema::states`.
    pub id: String,
    /// Event name to transition. Empty or absent means terminal.
    #[serde(default)]
    pub on: BTreeMap<String, Transition>,
    #[serde(default)]
    pub meta: StateMeta,
}

impl StateDefinition {
    /// A terminal state with default weight and no rules.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            on: BTreeMap::new(),
            meta: StateMeta::default(),
        }
    }

    /// Adds an unconditional transition; replaces any existing one for `event`.
    pub fn transition(mut self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.on.insert(event.into(), Transition::to(target));
        self
    }

    /// Adds a guarded transition; replaces any existing one for `event`.
    pub fn transition_if(
        mut self,
        event: impl Into<String>,
        target: impl Into<String>,
        cond: impl Fn(&FormContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.on.insert(event.into(), Transition::to_if(target, cond));
        self
    }

    /// Sets the progress weight.
    pub fn weight(mut self, weight: f64) -> Self {
        self.meta.weight = weight;
        self
    }

    /// Sets the validation rules applied when leaving this state.
    pub fn validation(mut self, rules: Vec<ValidationRule>) -> Self {
        self.meta.validation = rules;
        self
    }

    /// True when the state has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        self.on.is_empty()
    }
}

/// The immutable graph definition: states, the starting state, and an
/// optional default context merged in at init/reset.
#[derive(Clone, Debug, Deserialize)]
pub struct Schema {
    pub id: String,
    /// Name of the starting state; must exist in `states`.
    pub initial: String,
    pub states: BTreeMap<String, StateDefinition>,
    /// Default context payload.
    #[serde(default)]
    pub context: FormContext,
}

impl Schema {
    /// An empty schema; add states with [`Schema::state`].
    pub fn new(id: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial: initial.into(),
            states: BTreeMap::new(),
            context: FormContext::new(),
        }
    }

    /// Adds a state keyed by its own id; replaces if the id is taken.
    pub fn state(mut self, definition: StateDefinition) -> Self {
        self.states.insert(definition.id.clone(), definition);
        self
    }

    /// Sets the default context merged in at construction and reset.
    pub fn with_context(mut self, context: FormContext) -> Self {
        self.context = context;
        self
    }

    /// Parses a schema from its JSON file format and runs the load-time
    /// validation pass.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema =
            serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Attaches a guard to an already-defined transition. JSON-loaded schemas
    /// carry no guards, so this is how conditions reach them.
    pub fn set_condition(
        &mut self,
        state: &str,
        event: &str,
        cond: impl Fn(&FormContext) -> bool + Send + Sync + 'static,
    ) -> Result<(), SchemaError> {
        let definition = self
            .states
            .get_mut(state)
            .ok_or_else(|| SchemaError::UnknownState(state.to_string()))?;
        let transition =
            definition
                .on
                .get_mut(event)
                .ok_or_else(|| SchemaError::UnknownTransition {
                    state: state.to_string(),
                    event: event.to_string(),
                })?;
        transition.cond = Some(Arc::new(cond));
        Ok(())
    }
}
