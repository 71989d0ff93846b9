//! # formgraph
//!
//! An embeddable state machine for multi-step forms: a directed graph of
//! named states with labeled, optionally guarded transitions, a mutable
//! context that accumulates form data, weighted progress estimation, linear
//! undo history, and optional persistence.
//!
//! ## Design Principles
//!
//! - **Schema is data**: the graph definition is an immutable value, built in
//!   code or parsed from JSON, validated eagerly at load.
//! - **One engine per session**: the engine owns the session state and is
//!   driven one operation at a time; mutating operations take `&mut self`.
//! - **Derived metrics are pure**: progress weighting and path enumeration
//!   are stateless functions over the schema graph.
//!
//! ## Main Modules
//!
//! - [`schema`]: `Schema`, `StateDefinition`, `Transition` — define and
//!   validate the form graph.
//! - [`engine`]: `FormEngine`, `EngineState`, events — drive a session.
//! - [`path`]: weighted progress and exhaustive path enumeration.
//! - [`validator`]: field rules and the pre-transition validation pass.
//! - [`storage`]: the `StorageAdapter` seam with in-memory and SQLite
//!   implementations.
//! - [`export`]: Mermaid flowchart text and schema statistics for tooling.
//!
//! ## Features
//!
//! - `sqlite` (default): persistent storage adapter.
//! - `tracing`: structured logging via the `tracing` crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use formgraph::{EngineOptions, FormEngine, Schema, StateDefinition};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), formgraph::EngineError> {
//! let schema = Schema::new("signup", "account")
//!     .state(StateDefinition::new("account").transition("NEXT", "profile"))
//!     .state(StateDefinition::new("profile").weight(2.0).transition("NEXT", "done"))
//!     .state(StateDefinition::new("done"));
//!
//! let mut engine = FormEngine::new(EngineOptions::new(schema))?;
//! engine.start().await?;
//! engine.transition("NEXT", None).await?;
//! assert_eq!(engine.current_state(), "profile");
//! assert!(engine.progress() > 0.0);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod export;
mod logging;
pub mod path;
pub mod schema;
pub mod storage;
pub mod validator;

pub use engine::{EngineEvent, EngineOptions, EngineState, EventKind, FormEngine, HandlerId, StepChange};
pub use error::EngineError;
pub use export::SchemaStats;
pub use schema::{Condition, FormContext, Schema, SchemaError, StateDefinition, StateMeta, Transition};
pub use storage::{MemoryStorage, StorageAdapter, StorageError, DEFAULT_STORAGE_KEY};
#[cfg(feature = "sqlite")]
pub use storage::SqliteStorage;
pub use validator::{CustomValidator, ValidationResult, ValidationRule};
