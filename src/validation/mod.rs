//! Request validation subsystem.
//!
//! # Data Flow
//! ```text
//! Registry: name → ValidatorSpec { schema, stop_on_first_error }
//!     → validator stage (one per declared validator, built at compile time)
//!     → per request: Validator::with_rules(schema, mode, rules)
//!     → validate(data bag)
//!         → Ok(true)  : next stage
//!         → Ok(false) : 422 with the error map, chain stops
//! ```
//!
//! # Design Decisions
//! - `required` is checked first and separately; it never runs as a normal rule
//! - Fields and rules are evaluated in declaration order
//! - Failing rules are data, not errors; only a missing rule is an error

pub mod engine;
pub mod rules;
pub mod schema;

use std::sync::Arc;

pub use engine::{RuleError, Validator};
pub use rules::{FnRule, Rule, RuleSet};
pub use schema::{FieldRules, ValidationErrors, ValidationSchema};

/// A registered validator: a schema plus an optional mode override.
#[derive(Debug, Clone)]
pub struct ValidatorSpec {
    pub schema: Arc<ValidationSchema>,
    /// `None` falls back to `[validation] stop_on_first_error`.
    pub stop_on_first_error: Option<bool>,
}

impl ValidatorSpec {
    pub fn new(schema: ValidationSchema) -> Self {
        Self {
            schema: Arc::new(schema),
            stop_on_first_error: None,
        }
    }

    /// Report every failing rule instead of the first one.
    pub fn accumulate(mut self) -> Self {
        self.stop_on_first_error = Some(false);
        self
    }

    pub fn stop_on_first_error(mut self) -> Self {
        self.stop_on_first_error = Some(true);
        self
    }
}
