//! Per-request state handed from stage to stage.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use axum::http::{Extensions, HeaderMap, Method, Uri};
use axum::response::Response;
use serde_json::{Map, Value};

use crate::http::request::RequestId;
use crate::http::response::Responder;

/// Entities attached by binder stages, keyed by model name.
pub type BoundModels = HashMap<String, Value>;

/// What a stage wants to happen next.
pub enum Flow {
    /// Hand control to the next stage.
    Next,
    /// Stop the chain and send this response.
    Respond(Response),
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Next => f.write_str("Next"),
            Flow::Respond(res) => write!(f, "Respond({})", res.status()),
        }
    }
}

/// Identity of the route a request was dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    /// Path as registered on the native router.
    pub path: String,
    /// Fully-qualified name (`group.subgroup.route`), if the route is named.
    pub name: Option<String>,
}

impl RouteInfo {
    /// The name if there is one, otherwise the path.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }
}

/// The in-flight request as seen by middleware, validators, binders,
/// policies, and finally the controller.
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Raw path parameters as matched by the native router.
    pub params: HashMap<String, String>,
    /// Query, path, and body parameters merged (later sources win).
    pub data: Map<String, Value>,
    /// Entities resolved by binder stages.
    pub models: BoundModels,
    /// Per-request service container.
    pub services: Extensions,
    route: Arc<RouteInfo>,
    responder: Arc<Responder>,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri, route: Arc<RouteInfo>, responder: Arc<Responder>) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            params: HashMap::new(),
            data: Map::new(),
            models: BoundModels::new(),
            services: Extensions::new(),
            route,
            responder,
        }
    }

    /// A value from the merged data bag.
    pub fn input(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// A bound entity by model name.
    pub fn model(&self, name: &str) -> Option<&Value> {
        self.models.get(name)
    }

    pub fn route(&self) -> &RouteInfo {
        &self.route
    }

    /// Response helpers.
    pub fn respond(&self) -> &Responder {
        &self.responder
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.services.get::<RequestId>()
    }
}
