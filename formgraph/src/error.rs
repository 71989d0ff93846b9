//! Engine operation error types.
//!
//! Hard failures returned by `FormEngine` operations. Validation-rule failures
//! are not here: they surface softly through the `ValidationError` event.

use thiserror::Error;

use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Error returned by `FormEngine` operations.
///
/// Every variant aborts the operation with no state mutation, except that
/// `ConditionNotMet` is raised after transition data has already been merged
/// into the context (data capture is not lost by a rejected transition).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The current state is terminal but a transition was attempted.
    #[error("no transitions defined for state: {0}")]
    NoTransitionsDefined(String),

    /// The event is not present in the current state's transition table.
    #[error("no transition found for event: {event} in state: {state}")]
    UnknownEvent { event: String, state: String },

    /// A conditional transition's guard rejected the current context.
    #[error("condition not met for transition to: {0}")]
    ConditionNotMet(String),

    /// `back()` was called with empty history.
    #[error("cannot go back: no history available")]
    NoHistory,

    /// The schema failed its load-time validation pass.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A save or clear on the storage adapter failed. Load failures are
    /// absorbed by the engine and treated as "no saved state".
    #[error(transparent)]
    Storage(#[from] StorageError),
}
