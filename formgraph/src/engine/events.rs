//! Engine events and the observer registry.
//!
//! Observers register per event kind and are invoked synchronously, in
//! registration order, inside the operation that triggered the event. A
//! panicking observer is caught and logged so the remaining observers still
//! run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::logging;
use crate::schema::FormContext;

use super::state::EngineState;

/// Payload of a `StepChange` event and of the step-change callback.
#[derive(Clone, Debug)]
pub struct StepChange {
    pub from: String,
    pub to: String,
    pub context: FormContext,
}

/// Event published by the engine to its observers.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// The engine started (always emitted by `start`, after any resume).
    Started { state: EngineState },
    /// A saved snapshot replaced the fresh state during `start`.
    Resumed { state: EngineState },
    /// A forward or backward step changed the current state.
    StepChange(StepChange),
    /// Context changed without a transition.
    ContextUpdate { context: FormContext },
    /// A terminal state was reached.
    Complete { context: FormContext },
    /// Validation rejected a transition; no state changed.
    ValidationError { errors: Vec<String> },
    /// The session was reset to a fresh state.
    Reset,
}

/// Discriminant used to register observers for one kind of event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Started,
    Resumed,
    StepChange,
    ContextUpdate,
    Complete,
    ValidationError,
    Reset,
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::Started { .. } => EventKind::Started,
            EngineEvent::Resumed { .. } => EventKind::Resumed,
            EngineEvent::StepChange(_) => EventKind::StepChange,
            EngineEvent::ContextUpdate { .. } => EventKind::ContextUpdate,
            EngineEvent::Complete { .. } => EventKind::Complete,
            EngineEvent::ValidationError { .. } => EventKind::ValidationError,
            EngineEvent::Reset => EventKind::Reset,
        }
    }
}

impl EventKind {
    /// Event name as exposed to callers (log output, diagnostics).
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Started => "started",
            EventKind::Resumed => "resumed",
            EventKind::StepChange => "stepChange",
            EventKind::ContextUpdate => "contextUpdate",
            EventKind::Complete => "complete",
            EventKind::ValidationError => "validationError",
            EventKind::Reset => "reset",
        }
    }
}

/// Handle returned by `on`; pass to `off` to remove the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerId(u64);

type EventCallback = Box<dyn Fn(&EngineEvent) + Send + Sync>;

/// Observer registry: event kind to ordered callbacks.
#[derive(Default)]
pub(crate) struct EventRegistry {
    listeners: HashMap<EventKind, Vec<(HandlerId, EventCallback)>>,
    next_id: u64,
}

impl EventRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one event kind; every registration gets its
    /// own handle, so registering the same closure twice runs it twice.
    pub(crate) fn on(
        &mut self,
        kind: EventKind,
        callback: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Removes one registration. Returns false when the handle is unknown.
    pub(crate) fn off(&mut self, id: HandlerId) -> bool {
        for callbacks in self.listeners.values_mut() {
            if let Some(index) = callbacks.iter().position(|(handle, _)| *handle == id) {
                callbacks.remove(index);
                return true;
            }
        }
        false
    }

    /// Invokes every callback registered for the event's kind, in
    /// registration order. Panics are isolated per callback.
    pub(crate) fn emit(&self, event: &EngineEvent) {
        let Some(callbacks) = self.listeners.get(&event.kind()) else {
            return;
        };
        for (_, callback) in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                logging::log_listener_panic(event.kind().name());
            }
        }
    }
}
