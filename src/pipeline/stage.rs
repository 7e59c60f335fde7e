//! Pipeline stages for middleware, validators, and policies.
//!
//! Binder stages live with the binding subsystem.

use std::sync::Arc;
use async_trait::async_trait;
use axum::http::StatusCode;

use crate::http::response::codes;
use crate::pipeline::{Flow, RequestContext};
use crate::policy::Policy;
use crate::registry::Middleware;
use crate::validation::{RuleSet, Validator, ValidatorSpec};

/// Which part of the chain a stage belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Middleware,
    Validation,
    Binding,
    Policy,
}

impl StageKind {
    /// Metric label for requests answered by a stage of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Middleware => "middleware",
            StageKind::Validation => "validation",
            StageKind::Binding => "binding",
            StageKind::Policy => "policy",
        }
    }
}

/// One link of a compiled request pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable label, e.g. `middleware:auth` or `policy:post@update`.
    fn label(&self) -> &str;

    fn kind(&self) -> StageKind;

    async fn run(&self, ctx: &mut RequestContext) -> Flow;
}

pub struct MiddlewareStage {
    label: String,
    inner: Arc<dyn Middleware>,
}

impl MiddlewareStage {
    pub fn new(name: &str, inner: Arc<dyn Middleware>) -> Self {
        Self {
            label: format!("middleware:{name}"),
            inner,
        }
    }
}

#[async_trait]
impl Stage for MiddlewareStage {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> StageKind {
        StageKind::Middleware
    }

    async fn run(&self, ctx: &mut RequestContext) -> Flow {
        self.inner.handle(ctx).await
    }
}

/// Runs one validator schema against the data bag.
pub struct ValidatorStage {
    label: String,
    spec: Arc<ValidatorSpec>,
    stop_on_first_error: bool,
    rules: Arc<RuleSet>,
}

impl ValidatorStage {
    /// `default_stop` applies when the spec does not pick a mode itself.
    pub fn new(name: &str, spec: Arc<ValidatorSpec>, default_stop: bool, rules: Arc<RuleSet>) -> Self {
        let stop_on_first_error = spec.stop_on_first_error.unwrap_or(default_stop);
        Self {
            label: format!("validator:{name}"),
            spec,
            stop_on_first_error,
            rules,
        }
    }
}

#[async_trait]
impl Stage for ValidatorStage {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> StageKind {
        StageKind::Validation
    }

    async fn run(&self, ctx: &mut RequestContext) -> Flow {
        let mut validator = Validator::with_rules(
            Arc::clone(&self.spec.schema),
            self.stop_on_first_error,
            Arc::clone(&self.rules),
        );

        match validator.validate(&ctx.data).await {
            Ok(true) => Flow::Next,
            Ok(false) => {
                tracing::debug!(
                    validator = %self.label,
                    fields = validator.errors().len(),
                    "Validation failed"
                );
                Flow::Respond(ctx.respond().validation_error(validator.errors()))
            }
            Err(e) => {
                tracing::error!(validator = %self.label, error = %e, "Validator misconfigured");
                Flow::Respond(ctx.respond().error(
                    codes::CONFIGURATION_ERROR,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some(&e.to_string()),
                    None,
                ))
            }
        }
    }
}

/// Evaluates one policy method; a denial answers 403.
pub struct PolicyStage {
    label: String,
    name: String,
    method: String,
    policy: Arc<dyn Policy>,
}

impl PolicyStage {
    pub fn new(name: &str, method: &str, policy: Arc<dyn Policy>) -> Self {
        Self {
            label: format!("policy:{name}@{method}"),
            name: name.to_string(),
            method: method.to_string(),
            policy,
        }
    }
}

#[async_trait]
impl Stage for PolicyStage {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> StageKind {
        StageKind::Policy
    }

    async fn run(&self, ctx: &mut RequestContext) -> Flow {
        if self.policy.evaluate(&self.method, ctx).await {
            Flow::Next
        } else {
            tracing::debug!(policy = %self.name, method = %self.method, "Policy denied request");
            Flow::Respond(ctx.respond().policy_error(&self.name, &self.method))
        }
    }
}
