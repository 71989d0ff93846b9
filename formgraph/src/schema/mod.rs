//! Schema: the immutable graph definition and its load-time validation.
//!
//! Build in code with the `Schema`/`StateDefinition` chaining methods, or
//! parse the JSON file format with `Schema::from_json`. Validation is eager:
//! engines refuse to construct around a schema with dangling targets.

mod definition;
mod validate;

pub use definition::{Condition, FormContext, Schema, StateDefinition, StateMeta, Transition};
pub use validate::SchemaError;
