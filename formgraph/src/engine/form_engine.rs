//! The form engine: owns session state and drives transitions.

use std::sync::Arc;

use crate::error::EngineError;
use crate::logging;
use crate::path;
use crate::schema::{FormContext, Schema};
use crate::storage::StorageAdapter;
use crate::validator;

use super::events::{EngineEvent, EventKind, EventRegistry, HandlerId, StepChange};
use super::options::{CompleteCallback, EngineOptions, ErrorCallback, StepChangeCallback};
use super::state::EngineState;

/// The core state machine for one form session.
///
/// Owns the current state, context, history, and completed-step set; consults
/// the schema and validator to decide transition legality, asks the path
/// module for derived metrics on demand, persists through the storage adapter
/// when one is bound, and publishes events to observers.
///
/// Operations that mutate take `&mut self`, so overlapping calls against one
/// engine cannot be expressed; callers drive one operation to completion
/// before the next.
pub struct FormEngine {
    schema: Schema,
    state: EngineState,
    storage: Option<Arc<dyn StorageAdapter>>,
    listeners: EventRegistry,
    on_step_change: Option<StepChangeCallback>,
    on_complete: Option<CompleteCallback>,
    on_error: Option<ErrorCallback>,
}

impl FormEngine {
    /// Builds an engine around a validated schema. Rejects schemas that fail
    /// the load-time validation pass.
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        options.schema.validate()?;
        let state = EngineState::fresh(&options.schema);
        Ok(Self {
            schema: options.schema,
            state,
            storage: options.storage,
            listeners: EventRegistry::new(),
            on_step_change: options.on_step_change,
            on_complete: options.on_complete,
            on_error: options.on_error,
        })
    }

    /// Starts the session. With storage bound, attempts to resume: a loadable
    /// snapshot replaces the fresh state wholesale and emits `Resumed`; a
    /// missing or unloadable one is logged and ignored. Always emits
    /// `Started` afterward. Never fails on missing saved state.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        if let Some(storage) = &self.storage {
            match storage.load().await {
                Ok(Some(saved)) => {
                    if self.schema.states.contains_key(&saved.current_state) {
                        self.state = saved;
                        logging::log_resumed(&self.state.current_state);
                        self.listeners.emit(&EngineEvent::Resumed {
                            state: self.state.clone(),
                        });
                    } else {
                        logging::log_stale_snapshot(&saved.current_state);
                    }
                }
                Ok(None) => {}
                Err(error) => logging::log_load_failed(&error),
            }
        }

        self.listeners.emit(&EngineEvent::Started {
            state: self.state.clone(),
        });
        Ok(())
    }

    /// Takes one step: resolves `event` in the current state's transition
    /// table, merges `data` into the context, checks the guard and the
    /// current state's validation rules, then commits.
    ///
    /// Failure modes, in order: `NoTransitionsDefined` on a terminal state,
    /// `UnknownEvent` when the event is absent, `ConditionNotMet` when the
    /// guard rejects. None of these mutate state — except that `data` is
    /// merged before the guard runs (guards may depend on incoming data), so
    /// captured data survives a rejected transition. A validation failure is
    /// softer still: it emits `ValidationError`, invokes the error callback,
    /// and returns `Ok` with no transition.
    ///
    /// On commit: the former state joins history and the completed set, the
    /// new state is persisted (before observers see it, so storage matches
    /// what they see), `StepChange` fires, and reaching a terminal state
    /// fires `Complete`.
    pub async fn transition(
        &mut self,
        event: &str,
        data: Option<FormContext>,
    ) -> Result<(), EngineError> {
        let current = self.state.current_state.clone();
        let definition = self
            .schema
            .states
            .get(&current)
            .expect("current state is a schema state");

        if definition.on.is_empty() {
            return Err(EngineError::NoTransitionsDefined(current));
        }

        let transition = definition
            .on
            .get(event)
            .ok_or_else(|| EngineError::UnknownEvent {
                event: event.to_string(),
                state: current.clone(),
            })?;
        let target = transition.target.clone();
        let cond = transition.cond.clone();

        // Incoming data lands before the guard runs; it is kept even if the
        // guard or validation rejects the transition.
        if let Some(data) = data {
            self.state.context.extend(data);
        }

        if let Some(cond) = cond {
            if !cond(&self.state.context) {
                return Err(EngineError::ConditionNotMet(target));
            }
        }

        let validation = validator::validate_path(&current, &self.state.context, &self.schema);
        if !validation.valid {
            self.listeners.emit(&EngineEvent::ValidationError {
                errors: validation.errors.clone(),
            });
            if let Some(on_error) = &self.on_error {
                on_error(&validation.errors);
            }
            return Ok(());
        }

        self.state.completed_steps.insert(current.clone());
        self.state.history.push(current.clone());
        self.state.current_state = target.clone();

        self.persist().await?;

        logging::log_transition(&current, &target, event);
        let change = StepChange {
            from: current,
            to: target.clone(),
            context: self.state.context.clone(),
        };
        self.listeners.emit(&EngineEvent::StepChange(change.clone()));
        if let Some(on_step_change) = &self.on_step_change {
            on_step_change(&change);
        }

        let reached = self
            .schema
            .states
            .get(&target)
            .expect("transition targets are validated");
        if reached.is_terminal() {
            self.listeners.emit(&EngineEvent::Complete {
                context: self.state.context.clone(),
            });
            if let Some(on_complete) = &self.on_complete {
                on_complete(&self.state.context);
            }
        }

        Ok(())
    }

    /// Undoes one step: pops the last history entry back into the current
    /// state and removes the undone state from the completed set. The
    /// context is never rolled back. Fails with `NoHistory` when there is
    /// nothing to pop.
    pub async fn back(&mut self) -> Result<(), EngineError> {
        let previous = self.state.history.pop().ok_or(EngineError::NoHistory)?;
        let former = std::mem::replace(&mut self.state.current_state, previous.clone());
        self.state.completed_steps.remove(&former);

        self.persist().await?;

        logging::log_back(&former, &previous);
        self.listeners.emit(&EngineEvent::StepChange(StepChange {
            from: former,
            to: previous,
            context: self.state.context.clone(),
        }));
        Ok(())
    }

    /// Shallow-merges `data` into the context without transitioning, persists,
    /// and emits `ContextUpdate`.
    pub async fn update_context(&mut self, data: FormContext) -> Result<(), EngineError> {
        self.state.context.extend(data);
        self.persist().await?;
        self.listeners.emit(&EngineEvent::ContextUpdate {
            context: self.state.context.clone(),
        });
        Ok(())
    }

    /// Replaces the session with a fresh one, clears persisted state, and
    /// emits `Reset`.
    pub async fn reset(&mut self) -> Result<(), EngineError> {
        self.state = EngineState::fresh(&self.schema);
        if let Some(storage) = &self.storage {
            storage.clear().await?;
        }
        self.listeners.emit(&EngineEvent::Reset);
        Ok(())
    }

    /// Progress percentage over the completed-step weights; see the path
    /// module for the denominator's cycle policy.
    pub fn progress(&self) -> f64 {
        path::progress(&self.state.completed_steps, &self.schema)
    }

    /// Target names one transition away from the current state, in
    /// transition-table order. Conditions are NOT evaluated: this lists the
    /// syntactically possible next states, unlike `transition`'s runtime
    /// guard check.
    pub fn possible_next_states(&self) -> Vec<String> {
        self.schema
            .states
            .get(&self.state.current_state)
            .map(|definition| {
                definition
                    .on
                    .values()
                    .map(|transition| transition.target.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every terminal-ending simple path from the current state, with
    /// conditions evaluated against the current context (unlike
    /// `possible_next_states`).
    pub fn possible_paths(&self) -> Vec<Vec<String>> {
        path::possible_paths(&self.state.current_state, &self.schema, &self.state.context)
    }

    pub fn can_go_back(&self) -> bool {
        !self.state.history.is_empty()
    }

    pub fn current_state(&self) -> &str {
        &self.state.current_state
    }

    pub fn context(&self) -> &FormContext {
        &self.state.context
    }

    /// The full session state, for snapshots and debugging.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Registers an observer for one event kind; returns a handle for `off`.
    /// Each registration is independent and observers run in registration
    /// order.
    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> HandlerId {
        self.listeners.on(kind, callback)
    }

    /// Removes one observer registration.
    pub fn off(&mut self, id: HandlerId) -> bool {
        self.listeners.off(id)
    }

    async fn persist(&self) -> Result<(), EngineError> {
        if let Some(storage) = &self.storage {
            storage.save(&self.state).await?;
        }
        Ok(())
    }
}
