//! The stage that loads one bound model.

use std::sync::Arc;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::binding::Binder;
use crate::http::response::codes;
use crate::persistence::Repository;
use crate::pipeline::{Flow, RequestContext, Stage, StageKind};

/// Reads the identifier from the data bag, loads the entity, and attaches
/// it under the model name.
pub struct BinderStage {
    binder: Binder,
    repository: Arc<dyn Repository>,
    label: String,
}

impl BinderStage {
    pub fn new(binder: Binder, repository: Arc<dyn Repository>) -> Self {
        let label = if binder.field == binder.model {
            format!("binder:{}", binder.model)
        } else {
            format!("binder:{}->{}", binder.field, binder.model)
        };
        Self {
            binder,
            repository,
            label,
        }
    }
}

/// Identifiers are strings or numbers; anything else counts as missing.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl Stage for BinderStage {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> StageKind {
        StageKind::Binding
    }

    async fn run(&self, ctx: &mut RequestContext) -> Flow {
        let Binder { field, model } = &self.binder;

        let Some(id) = identifier(ctx.input(field)) else {
            tracing::debug!(field = %field, model = %model, "Binding identifier missing");
            return Flow::Respond(ctx.respond().error(
                codes::MISSING_IDENTIFIER,
                StatusCode::BAD_REQUEST,
                None,
                Some(json!({ "field": field, "modelName": model })),
            ));
        };

        match self.repository.find_by_id(model, &id).await {
            Ok(Some(entity)) => {
                ctx.models.insert(model.clone(), entity);
                Flow::Next
            }
            Ok(None) => not_found(ctx, model),
            Err(e) => {
                tracing::debug!(model = %model, id = %id, error = %e, "Model lookup failed");
                not_found(ctx, model)
            }
        }
    }
}

fn not_found(ctx: &RequestContext, model: &str) -> Flow {
    Flow::Respond(ctx.respond().error(
        codes::MODEL_NOT_FOUND,
        StatusCode::NOT_FOUND,
        None,
        Some(json!({ "modelName": model })),
    ))
}
