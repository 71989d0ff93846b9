//! Engine construction options.

use std::sync::Arc;

use crate::schema::{FormContext, Schema};
use crate::storage::StorageAdapter;

use super::events::StepChange;

pub type StepChangeCallback = Box<dyn Fn(&StepChange) + Send + Sync>;
pub type CompleteCallback = Box<dyn Fn(&FormContext) + Send + Sync>;
pub type ErrorCallback = Box<dyn Fn(&[String]) + Send + Sync>;

/// Options for `FormEngine::new`: the schema, an optional storage adapter
/// (auto-save is on exactly when one is supplied; the adapter owns its
/// storage key), and optional direct callbacks alongside the event
/// subsystem.
pub struct EngineOptions {
    pub(crate) schema: Schema,
    pub(crate) storage: Option<Arc<dyn StorageAdapter>>,
    pub(crate) on_step_change: Option<StepChangeCallback>,
    pub(crate) on_complete: Option<CompleteCallback>,
    pub(crate) on_error: Option<ErrorCallback>,
}

impl EngineOptions {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            storage: None,
            on_step_change: None,
            on_complete: None,
            on_error: None,
        }
    }

    /// Enables auto-save through the given adapter.
    pub fn with_storage(mut self, storage: Arc<dyn StorageAdapter>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Called after every committed forward transition.
    pub fn on_step_change(mut self, f: impl Fn(&StepChange) + Send + Sync + 'static) -> Self {
        self.on_step_change = Some(Box::new(f));
        self
    }

    /// Called when a transition reaches a terminal state.
    pub fn on_complete(mut self, f: impl Fn(&FormContext) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Called with the failing rule messages when validation rejects a
    /// transition.
    pub fn on_error(mut self, f: impl Fn(&[String]) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}
