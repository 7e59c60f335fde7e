//! A compiled route: bootstrap, ordered stages, controller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use axum::body::Body;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use futures_util::StreamExt;

use crate::http::request::{aggregate, body_params, query_params, RequestId};
use crate::http::response::{codes, Responder};
use crate::observability::metrics;
use crate::pipeline::{Flow, RequestContext, RouteInfo, Stage};
use crate::registry::Handler;

/// Everything one registered route runs per request.
///
/// Built once by the route tree, then shared by every request through an
/// `Arc`. Stages never change after compilation.
pub struct Pipeline {
    route: Arc<RouteInfo>,
    responder: Arc<Responder>,
    body_limit: usize,
    stages: Vec<Box<dyn Stage>>,
    controller_label: String,
    controller: Handler,
}

impl Pipeline {
    pub fn new(
        route: RouteInfo,
        responder: Arc<Responder>,
        body_limit: usize,
        controller_label: impl Into<String>,
        controller: Handler,
    ) -> Self {
        Self {
            route: Arc::new(route),
            responder,
            body_limit,
            stages: Vec::new(),
            controller_label: controller_label.into(),
            controller,
        }
    }

    /// Append a stage; stages run in push order.
    pub fn push(&mut self, stage: impl Stage + 'static) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn route(&self) -> &RouteInfo {
        &self.route
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage labels in execution order, bootstrap and controller included.
    pub fn describe(&self) -> Vec<String> {
        std::iter::once("bootstrap".to_string())
            .chain(self.stages.iter().map(|s| s.label().to_string()))
            .chain(std::iter::once(self.controller_label.clone()))
            .collect()
    }

    /// Run the full chain for one request.
    pub async fn execute(&self, req: Request<Body>) -> Response {
        let start = Instant::now();

        let (outcome, response) = match self.bootstrap(req).await {
            Ok(ctx) => self.drive(ctx).await,
            Err(response) => ("bootstrap", response),
        };

        metrics::record_request(
            self.route.label(),
            outcome,
            response.status().as_u16(),
            start.elapsed(),
        );
        response
    }

    async fn drive(&self, mut ctx: RequestContext) -> (&'static str, Response) {
        for stage in &self.stages {
            if let Flow::Respond(response) = stage.run(&mut ctx).await {
                tracing::debug!(
                    route = %self.route.label(),
                    stage = %stage.label(),
                    status = response.status().as_u16(),
                    request_id = ?ctx.request_id().map(|id| id.0.as_str()),
                    "Pipeline short-circuited"
                );
                return (stage.kind().as_str(), response);
            }
        }
        ("controller", (self.controller)(ctx).await)
    }

    /// Turn the raw request into a [`RequestContext`]: path parameters, query,
    /// and body merged into the data bag, request id in the service container.
    async fn bootstrap(&self, req: Request<Body>) -> Result<RequestContext, Response> {
        let (mut parts, body) = req.into_parts();
        let mut ctx = RequestContext::new(
            parts.method.clone(),
            parts.uri.clone(),
            Arc::clone(&self.route),
            Arc::clone(&self.responder),
        );

        ctx.params = match RawPathParams::from_request_parts(&mut parts, &()).await {
            Ok(raw) => raw
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            // Routes without parameters have nothing to extract.
            Err(RawPathParamsRejection::MissingPathParams(_)) => HashMap::new(),
            // Undecodable segments stay as sent, so lookups on them miss.
            Err(_) => raw_path_params(&self.route.path, parts.uri.path()),
        };

        let query = query_params(&parts.uri).map_err(|e| self.malformed(&e.to_string()))?;
        let bytes = self.read_body(body).await?;
        let body = body_params(&parts.headers, &bytes).map_err(|e| self.malformed(&e.to_string()))?;
        ctx.data = aggregate(query, &ctx.params, body);

        let request_id = RequestId::from_headers(&parts.headers);
        ctx.services = std::mem::take(&mut parts.extensions);
        ctx.services.insert(request_id);
        ctx.headers = parts.headers;
        Ok(ctx)
    }

    /// Collect the body, answering 413 once it outgrows the configured limit.
    async fn read_body(&self, body: Body) -> Result<Vec<u8>, Response> {
        let mut stream = body.into_data_stream();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.malformed(&e.to_string()))?;
            if bytes.len() + chunk.len() > self.body_limit {
                tracing::debug!(
                    route = %self.route.label(),
                    limit = self.body_limit,
                    "Rejected oversized request body"
                );
                return Err(self.responder.error(
                    codes::PAYLOAD_TOO_LARGE,
                    StatusCode::PAYLOAD_TOO_LARGE,
                    None,
                    None,
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn malformed(&self, msg: &str) -> Response {
        tracing::debug!(route = %self.route.label(), error = %msg, "Rejected malformed request");
        self.responder
            .error(codes::MALFORMED_BODY, StatusCode::BAD_REQUEST, Some(msg), None)
    }
}

/// Pair `{name}` segments of the registered path with the raw request path.
fn raw_path_params(template: &str, path: &str) -> HashMap<String, String> {
    template
        .split('/')
        .zip(path.split('/'))
        .filter_map(|(pattern, segment)| {
            let name = pattern.strip_prefix('{')?.strip_suffix('}')?;
            Some((name.to_string(), segment.to_string()))
        })
        .collect()
}
