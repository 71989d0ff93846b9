//! Engine: session state, transitions, events, persistence hooks.

mod events;
mod form_engine;
mod options;
mod state;

pub use events::{EngineEvent, EventKind, HandlerId, StepChange};
pub use form_engine::FormEngine;
pub use options::EngineOptions;
pub use state::EngineState;
