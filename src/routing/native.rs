//! Adapter over `axum::Router`.

use std::collections::HashMap;
use std::sync::Arc;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::routing::{on, MethodFilter};
use axum::Router;

use crate::error::RouterError;
use crate::pipeline::Pipeline;

/// Collects compiled pipelines and registers them on an axum router.
///
/// axum panics on duplicate or conflicting routes; this type reports them as
/// [`RouterError`] instead, before the router is ever touched.
#[derive(Default)]
pub struct NativeRouter {
    inner: Router,
    /// (method, path) → fully-qualified route name, if any.
    registered: HashMap<(Method, String), Option<String>>,
    /// Parameter-insensitive path shape → first path registered with it.
    shapes: HashMap<String, String>,
}

impl NativeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend an existing axum router.
    pub fn from_axum(router: Router) -> Self {
        Self {
            inner: router,
            ..Self::default()
        }
    }

    /// Register `pipeline` under its route's method and path.
    pub fn register(&mut self, pipeline: Pipeline) -> Result<(), RouterError> {
        let method = pipeline.route().method.clone();
        let path = pipeline.route().path.clone();
        let name = pipeline.route().name.clone();

        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| RouterError::UnsupportedMethod(method.to_string()))?;

        let shape = shape_of(&path);
        if let Some(existing) = self.shapes.get(&shape) {
            if existing != &path {
                return Err(RouterError::ConflictingRoute {
                    path,
                    existing: existing.clone(),
                });
            }
        }
        if self.registered.contains_key(&(method.clone(), path.clone())) {
            return Err(RouterError::DuplicateRoute {
                method: method.to_string(),
                path,
            });
        }

        self.shapes.entry(shape).or_insert_with(|| path.clone());
        self.registered.insert((method, path.clone()), name);

        let pipeline = Arc::new(pipeline);
        let endpoint = move |req: Request<Body>| {
            let pipeline = Arc::clone(&pipeline);
            async move { pipeline.execute(req).await }
        };
        self.inner = std::mem::take(&mut self.inner).route(&path, on(filter, endpoint));
        Ok(())
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.registered.contains_key(&(method.clone(), path.to_string()))
    }

    /// The dotted name a route was registered under.
    pub fn route_name(&self, method: &Method, path: &str) -> Option<&str> {
        self.registered
            .get(&(method.clone(), path.to_string()))
            .and_then(|name| name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn into_axum(self) -> Router {
        self.inner
    }
}

/// `/users/{user}` and `/users/{id}` share the shape `/users/{}`.
fn shape_of(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
