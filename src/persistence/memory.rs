//! In-memory repository.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};

use crate::persistence::{Repository, RepositoryError};

/// A thread-safe, clonable entity store keyed by model name then identifier.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<DashMap<String, HashMap<String, Value>>>,
}

impl InMemoryRepository {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity.
    pub fn insert(&self, model: &str, id: impl Into<String>, entity: Value) {
        self.inner
            .entry(model.to_string())
            .or_default()
            .insert(id.into(), entity);
    }

    /// Remove an entity, returning it if it was present.
    pub fn remove(&self, model: &str, id: &str) -> Option<Value> {
        self.inner.get_mut(model).and_then(|mut m| m.remove(id))
    }

    /// Number of entities stored for `model`.
    pub fn count(&self, model: &str) -> usize {
        self.inner.get(model).map(|m| m.len()).unwrap_or(0)
    }
}

/// Scalars compare by their textual form so `"3"` from a path matches `3`.
fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a == b,
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s == &n.to_string()
        }
        _ => left == right,
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_by_id(&self, model: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
        Ok(self.inner.get(model).and_then(|m| m.get(id).cloned()))
    }

    async fn count_matching(
        &self,
        model: &str,
        filter: &Map<String, Value>,
    ) -> Result<u64, RepositoryError> {
        let Some(entities) = self.inner.get(model) else {
            return Ok(0);
        };

        let count = entities
            .iter()
            .filter(|(id, entity)| {
                filter.iter().all(|(field, expected)| {
                    if field == "id" && entity.get("id").is_none() {
                        return loosely_equal(&Value::String((*id).clone()), expected);
                    }
                    entity
                        .get(field)
                        .map(|actual| loosely_equal(actual, expected))
                        .unwrap_or(false)
                })
            })
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = InMemoryRepository::new();
        repo.insert("user", "1", json!({"name": "ada"}));

        assert_eq!(
            repo.find_by_id("user", "1").await.unwrap(),
            Some(json!({"name": "ada"}))
        );
        assert_eq!(repo.find_by_id("user", "2").await.unwrap(), None);
        assert_eq!(repo.find_by_id("post", "1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_count_matching() {
        let repo = InMemoryRepository::new();
        repo.insert("user", "1", json!({"name": "ada", "age": 36}));
        repo.insert("user", "2", json!({"name": "alan", "age": 41}));

        let mut filter = Map::new();
        filter.insert("age".into(), json!("36"));
        assert_eq!(repo.count_matching("user", &filter).await.unwrap(), 1);

        let mut by_id = Map::new();
        by_id.insert("id".into(), json!(2));
        assert_eq!(repo.count_matching("user", &by_id).await.unwrap(), 1);

        assert_eq!(repo.count_matching("post", &filter).await.unwrap(), 0);
    }

    #[test]
    fn test_remove() {
        let repo = InMemoryRepository::new();
        repo.insert("user", "1", json!({}));
        assert_eq!(repo.count("user"), 1);
        assert!(repo.remove("user", "1").is_some());
        assert_eq!(repo.count("user"), 0);
    }
}
