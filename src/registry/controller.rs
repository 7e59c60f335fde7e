//! Controllers: the terminal stage of every pipeline.

use std::future::Future;
use std::sync::Arc;
use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use indexmap::IndexMap;

use crate::pipeline::RequestContext;

/// A type-erased request handler.
pub type Handler = Arc<dyn Fn(RequestContext) -> BoxFuture<'static, Response> + Send + Sync>;

/// Box an async closure into a [`Handler`].
pub fn handler<F, Fut, R>(f: F) -> Handler
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |ctx: RequestContext| -> BoxFuture<'static, Response> {
        let fut = f(ctx);
        Box::pin(async move { fut.await.into_response() })
    })
}

/// A named set of actions, addressed as `controller@action`.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Whether `action` can be dispatched.
    fn supports(&self, action: &str) -> bool;

    /// Run `action`. Only called for supported actions.
    async fn call(&self, action: &str, ctx: RequestContext) -> Response;
}

/// A controller assembled from closures.
#[derive(Default)]
pub struct FnController {
    actions: IndexMap<String, Handler>,
}

impl FnController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action<F, Fut, R>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.actions.insert(name.into(), handler(f));
        self
    }
}

#[async_trait]
impl Controller for FnController {
    fn supports(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    async fn call(&self, action: &str, ctx: RequestContext) -> Response {
        match self.actions.get(action) {
            Some(handler) => handler(ctx).await,
            None => ctx.respond().error(
                crate::http::response::codes::CONFIGURATION_ERROR,
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                None,
                None,
            ),
        }
    }
}
