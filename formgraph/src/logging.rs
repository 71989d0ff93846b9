//! Logging utilities for engine execution.
//!
//! Structured logging for transitions, undo navigation, persistence, and
//! observer dispatch. Uses the `tracing` crate when the `tracing` feature is
//! enabled, with a stderr fallback otherwise.

use crate::storage::StorageError;

/// Log a committed forward transition.
pub(crate) fn log_transition(from: &str, to: &str, event: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(from = from, to = to, event = event, "Transition committed");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Transition committed: {} --{}--> {}", from, event, to);
}

/// Log a back-navigation step.
pub(crate) fn log_back(from: &str, to: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(from = from, to = to, "Stepped back");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Stepped back: {} -> {}", from, to);
}

/// Log a session resumed from a saved snapshot.
pub(crate) fn log_resumed(current_state: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(current_state = current_state, "Resumed from saved state");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Resumed from saved state: {}", current_state);
}

/// Log a load failure. The engine treats this as "no saved state".
pub(crate) fn log_load_failed(error: &StorageError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(?error, "Failed to load saved state; starting fresh");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[WARN] Failed to load saved state; starting fresh: {:?}", error);
}

/// Log a saved snapshot whose current state is unknown to the schema. The
/// engine discards it and starts fresh.
pub(crate) fn log_stale_snapshot(current_state: &str) {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        current_state = current_state,
        "Saved state names an unknown state; starting fresh"
    );

    #[cfg(not(feature = "tracing"))]
    eprintln!(
        "[WARN] Saved state names an unknown state; starting fresh: {}",
        current_state
    );
}

/// Log an observer callback that panicked during emission. Remaining
/// callbacks still run.
pub(crate) fn log_listener_panic(event: &str) {
    #[cfg(feature = "tracing")]
    tracing::error!(event = event, "Event listener panicked");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[ERROR] Event listener panicked during: {}", event);
}

/// Log states with no path from the initial state.
pub(crate) fn log_unreachable_states(schema_id: &str, states: &[String]) {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        schema_id = schema_id,
        states = ?states,
        "Schema has unreachable states"
    );

    #[cfg(not(feature = "tracing"))]
    eprintln!(
        "[WARN] Schema {} has unreachable states: {:?}",
        schema_id, states
    );
}
