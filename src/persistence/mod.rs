//! Persistence boundary used by model binders and the `exists` rule.
//!
//! # Data Flow
//! ```text
//! binder stage ──find_by_id(model, id)──▶ Repository ──▶ Some(entity) | None | Err
//! exists rule  ──count_matching(model, filter)──▶ Repository ──▶ count
//! ```
//!
//! # Design Decisions
//! - Entities are plain `serde_json::Value`s; the router never inspects them
//! - Lookup errors are the caller's to normalize (binders turn them into 404)
//! - One repository may back many model names

pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::InMemoryRepository;

/// Errors a repository may report.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The identifier is not in a shape the store understands.
    #[error("malformed identifier `{0}`")]
    MalformedId(String),

    /// The store could not be reached or failed internally.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Entity lookup collaborator.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Find one entity of `model` by identifier.
    async fn find_by_id(&self, model: &str, id: &str) -> Result<Option<Value>, RepositoryError>;

    /// Count entities of `model` whose fields equal every entry of `filter`.
    async fn count_matching(
        &self,
        model: &str,
        filter: &Map<String, Value>,
    ) -> Result<u64, RepositoryError>;
}
