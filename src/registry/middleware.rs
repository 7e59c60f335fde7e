//! Middleware: stages that run before validation.

use async_trait::async_trait;

use crate::pipeline::{Flow, RequestContext};

/// A request stage that may inspect or enrich the context, or answer early.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut RequestContext) -> Flow;
}

/// Adapts a synchronous closure into a [`Middleware`].
pub struct FnMiddleware<F>(F);

impl<F> FnMiddleware<F>
where
    F: Fn(&mut RequestContext) -> Flow + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut RequestContext) -> Flow + Send + Sync,
{
    async fn handle(&self, ctx: &mut RequestContext) -> Flow {
        (self.0)(ctx)
    }
}
