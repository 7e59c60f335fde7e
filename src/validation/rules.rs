//! Built-in validation rules.
//!
//! A rule is a predicate over one present value and the parameters declared
//! in the schema. Rules may be asynchronous (`exists` asks the repository).

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::registry::Models;

/// A named validation predicate.
#[async_trait]
pub trait Rule: Send + Sync {
    async fn check(&self, value: &Value, params: &Value) -> bool;
}

/// Adapts a synchronous closure into a [`Rule`].
pub struct FnRule<F>(F);

impl<F> FnRule<F>
where
    F: Fn(&Value, &Value) -> bool + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Rule for FnRule<F>
where
    F: Fn(&Value, &Value) -> bool + Send + Sync,
{
    async fn check(&self, value: &Value, params: &Value) -> bool {
        (self.0)(value, params)
    }
}

/// Rule implementations keyed by name.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleSet {
    /// The parameterless and range rules: `required`, `numeric`, `integer`,
    /// `string`, `between`, `lBetween`.
    pub fn standard() -> Self {
        let mut set = Self::default();
        set.insert("required", FnRule::new(|value, _| is_present(value)));
        set.insert("numeric", FnRule::new(|value, _| as_number(value).is_some()));
        set.insert("integer", FnRule::new(|value, _| is_integer(value)));
        set.insert("string", FnRule::new(|value, _| value.is_string()));
        set.insert("between", FnRule::new(between));
        set.insert("lBetween", FnRule::new(length_between));
        set
    }

    /// The standard rules plus `exists`, backed by the given models.
    pub fn with_models(models: Arc<Models>) -> Self {
        let mut set = Self::standard();
        set.insert("exists", ExistsRule { models });
        set
    }

    /// Add or replace a rule.
    pub fn insert(&mut self, name: impl Into<String>, rule: impl Rule + 'static) {
        self.rules.insert(name.into(), Arc::new(rule));
    }

    pub fn insert_shared(&mut self, name: impl Into<String>, rule: Arc<dyn Rule>) {
        self.rules.insert(name.into(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}

/// Absent means missing, `null`, or the empty string. `0` and `false` are present.
pub fn is_present(value: &Value) -> bool {
    !matches!(value, Value::Null) && value.as_str() != Some("")
}

/// Numbers, and strings that parse to a finite number.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        _ => as_number(value).map(|n| n.fract() == 0.0).unwrap_or(false),
    }
}

/// Reads `{"min": a, "max": b}` or `[a, b]`.
fn bounds(params: &Value) -> Option<(f64, f64)> {
    match params {
        Value::Object(map) => Some((as_number(map.get("min")?)?, as_number(map.get("max")?)?)),
        Value::Array(items) if items.len() == 2 => Some((as_number(&items[0])?, as_number(&items[1])?)),
        _ => None,
    }
}

fn between(value: &Value, params: &Value) -> bool {
    let Some((min, max)) = bounds(params) else {
        tracing::warn!(params = %params, "between rule needs min and max");
        return false;
    };
    as_number(value).map(|n| n >= min && n <= max).unwrap_or(false)
}

fn length_between(value: &Value, params: &Value) -> bool {
    let Some((min, max)) = bounds(params) else {
        tracing::warn!(params = %params, "lBetween rule needs min and max");
        return false;
    };
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        _ => return false,
    };
    (len as f64) >= min && (len as f64) <= max
}

/// Where an `exists` rule looks: `"user"` or `{"model": "user", "field": "email"}`.
pub(crate) fn exists_target(params: &Value) -> Option<(&str, &str)> {
    match params {
        Value::String(model) => Some((model.as_str(), "id")),
        Value::Object(map) => {
            let model = map.get("model")?.as_str()?;
            let field = map.get("field").and_then(Value::as_str).unwrap_or("id");
            Some((model, field))
        }
        _ => None,
    }
}

/// Passes when at least one record of the model matches the value.
struct ExistsRule {
    models: Arc<Models>,
}

#[async_trait]
impl Rule for ExistsRule {
    async fn check(&self, value: &Value, params: &Value) -> bool {
        let Some((model, field)) = exists_target(params) else {
            tracing::warn!(params = %params, "exists rule needs a model");
            return false;
        };
        let Some(repository) = self.models.get(model) else {
            tracing::warn!(model = %model, "exists rule references an unknown model");
            return false;
        };

        let mut filter = Map::new();
        filter.insert(field.to_string(), value.clone());
        match repository.count_matching(model, &filter).await {
            Ok(count) => count > 0,
            Err(e) => {
                tracing::warn!(model = %model, error = %e, "exists lookup failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::persistence::{InMemoryRepository, Repository};

    async fn check(set: &RuleSet, rule: &str, value: Value, params: Value) -> bool {
        set.get(rule).unwrap().check(&value, &params).await
    }

    #[tokio::test]
    async fn test_required_presence() {
        let set = RuleSet::standard();
        assert!(!check(&set, "required", Value::Null, json!(true)).await);
        assert!(!check(&set, "required", json!(""), json!(true)).await);
        assert!(check(&set, "required", json!(0), json!(true)).await);
        assert!(check(&set, "required", json!(false), json!(true)).await);
    }

    #[tokio::test]
    async fn test_numeric_and_integer() {
        let set = RuleSet::standard();
        assert!(check(&set, "numeric", json!("12.5"), json!(true)).await);
        assert!(check(&set, "numeric", json!(3), json!(true)).await);
        assert!(!check(&set, "numeric", json!("12abc"), json!(true)).await);
        assert!(!check(&set, "numeric", json!(true), json!(true)).await);
        assert!(!check(&set, "numeric", json!("inf"), json!(true)).await);

        assert!(check(&set, "integer", json!(7), json!(true)).await);
        assert!(check(&set, "integer", json!("42"), json!(true)).await);
        assert!(!check(&set, "integer", json!(7.5), json!(true)).await);
    }

    #[tokio::test]
    async fn test_between_is_inclusive() {
        let set = RuleSet::standard();
        let bounds = json!({"min": 5, "max": 6});
        assert!(check(&set, "between", json!(5), bounds.clone()).await);
        assert!(check(&set, "between", json!(6), bounds.clone()).await);
        assert!(check(&set, "between", json!("5.5"), bounds.clone()).await);
        assert!(!check(&set, "between", json!(6.01), bounds.clone()).await);
        assert!(!check(&set, "between", json!(4), json!([5, 6])).await);
        assert!(!check(&set, "between", json!(5), json!({"min": 5})).await);
    }

    #[tokio::test]
    async fn test_length_between() {
        let set = RuleSet::standard();
        assert!(check(&set, "lBetween", json!("héllo"), json!([5, 5])).await);
        assert!(check(&set, "lBetween", json!([1, 2]), json!({"min": 1, "max": 2})).await);
        assert!(!check(&set, "lBetween", json!("ab"), json!([3, 10])).await);
        assert!(!check(&set, "lBetween", json!(12345), json!([1, 10])).await);
    }

    #[tokio::test]
    async fn test_exists_counts_matching_records() {
        let repo = InMemoryRepository::new();
        repo.insert("user", "1", json!({"email": "ada@example.com"}));
        let mut models = Models::new();
        models.insert("user".to_string(), Arc::new(repo) as Arc<dyn Repository>);
        let set = RuleSet::with_models(Arc::new(models));

        assert!(check(&set, "exists", json!("1"), json!("user")).await);
        assert!(!check(&set, "exists", json!("2"), json!("user")).await);
        assert!(
            check(&set, "exists", json!("ada@example.com"), json!({"model": "user", "field": "email"})).await
        );
        assert!(!check(&set, "exists", json!("1"), json!("post")).await);
    }
}
