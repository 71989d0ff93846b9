//! Field and path validation.
//!
//! Pure predicate evaluation against the context. `validate_field` applies an
//! ordered rule list to one value and accumulates every failing rule's
//! message; it never short-circuits, so callers see all violations at once.
//! `validate_path` is what the engine consults before committing a
//! transition.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::schema::{FormContext, Schema};

/// Caller-supplied predicate for `custom` rules, taking the field value and
/// the full context.
#[derive(Clone)]
pub struct CustomValidator(pub Arc<dyn Fn(Option<&Value>, &FormContext) -> bool + Send + Sync>);

impl CustomValidator {
    pub fn new(f: impl Fn(Option<&Value>, &FormContext) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(<fn>)")
    }
}

/// One validation rule. On the wire this is `{type, message, value?}` tagged
/// by `type`; the `custom` predicate is code and never serialized.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValidationRule {
    /// Fails on absent, null, or empty-string values.
    Required { message: String },
    /// Fails unless a present, non-empty string matches `local@domain.tld`.
    Email { message: String },
    /// Numeric lower bound for numbers, length lower bound for strings.
    Min { message: String, value: f64 },
    /// Numeric upper bound for numbers, length upper bound for strings.
    Max { message: String, value: f64 },
    /// Regex test on present, non-empty strings.
    Pattern { message: String, value: String },
    /// Delegates to a caller-supplied predicate.
    Custom {
        message: String,
        #[serde(skip)]
        validator: Option<CustomValidator>,
    },
}

/// Outcome of a validation pass: `valid` iff `errors` is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

fn nonempty_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Applies `rules` to a single value, accumulating all failing rules'
/// messages. Rules that inspect strings apply only to JSON strings and
/// numeric bounds only to JSON numbers; values of any other type are
/// silently not checked.
pub fn validate_field(
    value: Option<&Value>,
    rules: &[ValidationRule],
    context: &FormContext,
) -> ValidationResult {
    let mut errors = Vec::new();

    for rule in rules {
        match rule {
            ValidationRule::Required { message } => {
                let missing = matches!(value, None | Some(Value::Null))
                    || matches!(value, Some(Value::String(s)) if s.is_empty());
                if missing {
                    errors.push(message.clone());
                }
            }
            ValidationRule::Email { message } => {
                if let Some(s) = nonempty_str(value) {
                    if !email_regex().is_match(s) {
                        errors.push(message.clone());
                    }
                }
            }
            ValidationRule::Min { message, value: min } => match value {
                Some(Value::Number(n)) => {
                    if n.as_f64().is_some_and(|v| v < *min) {
                        errors.push(message.clone());
                    }
                }
                Some(Value::String(s)) => {
                    if (s.chars().count() as f64) < *min {
                        errors.push(message.clone());
                    }
                }
                _ => {}
            },
            ValidationRule::Max { message, value: max } => match value {
                Some(Value::Number(n)) => {
                    if n.as_f64().is_some_and(|v| v > *max) {
                        errors.push(message.clone());
                    }
                }
                Some(Value::String(s)) => {
                    if (s.chars().count() as f64) > *max {
                        errors.push(message.clone());
                    }
                }
                _ => {}
            },
            ValidationRule::Pattern { message, value: pattern } => {
                if let Some(s) = nonempty_str(value) {
                    // Load-time validation guarantees the pattern compiles.
                    if let Ok(re) = Regex::new(pattern) {
                        if !re.is_match(s) {
                            errors.push(message.clone());
                        }
                    }
                }
            }
            ValidationRule::Custom { message, validator } => {
                if let Some(validator) = validator {
                    if !(validator.0)(value, context) {
                        errors.push(message.clone());
                    }
                }
            }
        }
    }

    ValidationResult::from_errors(errors)
}

/// Validates the current state's rules before a transition commits. A state's
/// rules check the context field literally named after the state.
pub fn validate_path(current_state: &str, context: &FormContext, schema: &Schema) -> ValidationResult {
    let rules = schema
        .states
        .get(current_state)
        .map(|definition| definition.meta.validation.as_slice())
        .unwrap_or(&[]);
    validate_field(context.get(current_state), rules, context)
}
