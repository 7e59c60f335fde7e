//! Validation schema and result types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failed rule names per field, in evaluation order. Empty means valid.
pub type ValidationErrors = IndexMap<String, Vec<String>>;

/// Rules declared for one field: rule name → parameters (`true` when the
/// rule takes none). Declaration order is evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FieldRules(IndexMap<String, Value>);

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the field as required.
    pub fn required(self) -> Self {
        self.rule("required", true)
    }

    /// Add a rule with parameters.
    pub fn rule(mut self, name: impl Into<String>, params: impl Into<Value>) -> Self {
        self.0.insert(name.into(), params.into());
        self
    }

    /// `required` only counts when declared truthy.
    pub fn is_required(&self) -> bool {
        matches!(self.0.get("required"), Some(Value::Bool(true)))
    }

    /// Every rule except `required`, in declaration order.
    pub fn checks(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter(|(name, _)| name.as_str() != "required")
            .map(|(name, params)| (name.as_str(), params))
    }
}

/// Field name → rules, evaluated in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ValidationSchema(IndexMap<String, FieldRules>);

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the rules for a field.
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        self.0.insert(name.into(), rules);
        self
    }

    /// Parse a JSON object, keeping key order.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.0.iter().map(|(name, rules)| (name.as_str(), rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_declaration_order() {
        let schema = ValidationSchema::from_json(
            r#"{"zeta": {"required": true, "string": true}, "alpha": {"numeric": true}}"#,
        )
        .unwrap();

        let fields: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_checks_skip_required() {
        let rules = FieldRules::new()
            .rule("string", true)
            .required()
            .rule("lBetween", serde_json::json!({"min": 1, "max": 3}));

        assert!(rules.is_required());
        let checks: Vec<_> = rules.checks().map(|(name, _)| name).collect();
        assert_eq!(checks, vec!["string", "lBetween"]);
    }

    #[test]
    fn test_required_false_is_not_required() {
        let rules = FieldRules::new().rule("required", false);
        assert!(!rules.is_required());
    }
}
