//! Authorization policies.
//!
//! # Data Flow
//! ```text
//! route.policy("post", "update")
//!     → compile: enforcer::resolve(registry, "post", "update")
//!         → unknown policy or method: RouterError (build fails)
//!     → per request: policy.evaluate("update", &ctx)
//!         → true  : next stage
//!         → false : 403 POLICY_DENIED, chain stops
//! ```
//!
//! # Design Decisions
//! - A denial is a boolean, a missing policy is a configuration error; the
//!   two never mix
//! - Policies see the fully prepared context (data bag and bound models)

pub mod enforcer;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::pipeline::RequestContext;

pub use enforcer::{enforce, resolve};

/// A named authorization object exposing one or more checks.
#[async_trait]
pub trait Policy: Send + Sync {
    /// Whether `method` is a check this policy knows.
    fn supports(&self, method: &str) -> bool;

    /// Evaluate `method` against the request.
    async fn evaluate(&self, method: &str, ctx: &RequestContext) -> bool;
}

type Check = Box<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// A policy assembled from synchronous closures.
#[derive(Default)]
pub struct FnPolicy {
    checks: IndexMap<String, Check>,
}

impl FnPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&RequestContext) -> bool + Send + Sync + 'static,
    {
        self.checks.insert(name.into(), Box::new(check));
        self
    }
}

#[async_trait]
impl Policy for FnPolicy {
    fn supports(&self, method: &str) -> bool {
        self.checks.contains_key(method)
    }

    async fn evaluate(&self, method: &str, ctx: &RequestContext) -> bool {
        self.checks.get(method).map(|check| check(ctx)).unwrap_or(false)
    }
}
