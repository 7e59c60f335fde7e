//! Schema evaluation against a request data bag.

use std::sync::Arc;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::validation::rules::{is_present, Rule, RuleSet};
use crate::validation::schema::{ValidationErrors, ValidationSchema};

/// Raised when a schema names a rule the validator cannot find.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("no implementation for validation rule `{0}`")]
    Missing(String),
}

/// Evaluates one schema, in stop-on-first-error or accumulate mode.
///
/// A validator is cheap to create: the schema and rule set are shared, and
/// [`Validator::extend`] copies the rule set before changing it.
#[derive(Clone)]
pub struct Validator {
    schema: Arc<ValidationSchema>,
    stop_on_first_error: bool,
    rules: Arc<RuleSet>,
    errors: ValidationErrors,
}

impl Validator {
    /// Validator over the standard rules.
    pub fn new(schema: impl Into<Arc<ValidationSchema>>, stop_on_first_error: bool) -> Self {
        Self::with_rules(schema, stop_on_first_error, Arc::new(RuleSet::standard()))
    }

    pub fn with_rules(
        schema: impl Into<Arc<ValidationSchema>>,
        stop_on_first_error: bool,
        rules: Arc<RuleSet>,
    ) -> Self {
        Self {
            schema: schema.into(),
            stop_on_first_error,
            rules,
            errors: ValidationErrors::new(),
        }
    }

    /// Register a rule for this validator only.
    pub fn extend(&mut self, name: impl Into<String>, rule: impl Rule + 'static) -> &mut Self {
        Arc::make_mut(&mut self.rules).insert(name, rule);
        self
    }

    /// Run the schema against `data`. Errors from a previous run are cleared.
    pub async fn validate(&mut self, data: &Map<String, Value>) -> Result<bool, RuleError> {
        self.errors.clear();
        let schema = Arc::clone(&self.schema);

        for (field, rules) in schema.fields() {
            let value = data.get(field).unwrap_or(&Value::Null);

            if !is_present(value) {
                if rules.is_required() {
                    self.add_error(field, "required");
                    if self.stop_on_first_error {
                        return Ok(false);
                    }
                }
                continue;
            }

            for (rule_name, params) in rules.checks() {
                let rule = self
                    .rules
                    .get(rule_name)
                    .ok_or_else(|| RuleError::Missing(rule_name.to_string()))?;

                if !rule.check(value, params).await {
                    self.add_error(field, rule_name);
                    if self.stop_on_first_error {
                        return Ok(false);
                    }
                }
            }
        }

        Ok(!self.has_errors())
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn add_error(&mut self, field: &str, rule: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(rule.to_string());
    }
}
