//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use route_builder::persistence::InMemoryRepository;
use route_builder::policy::FnPolicy;
use route_builder::registry::{FnController, FnMiddleware, Registry};
use route_builder::validation::{FieldRules, ValidationSchema, ValidatorSpec};
use route_builder::{App, Flow, RequestContext, Settings};

/// Two users, two posts (one each), one article.
pub fn store() -> InMemoryRepository {
    let store = InMemoryRepository::new();
    store.insert("user", "1", json!({ "id": 1, "name": "ada" }));
    store.insert("user", "2", json!({ "id": 2, "name": "bob" }));
    store.insert("post", "1", json!({ "id": 1, "title": "first", "authorId": 1 }));
    store.insert("post", "2", json!({ "id": 2, "title": "second", "authorId": 2 }));
    store.insert("article", "9", json!({ "id": 9, "title": "long read" }));
    store
}

/// Echoes the prepared request: data bag and bound models.
fn echo(ctx: RequestContext) -> impl std::future::Future<Output = axum::response::Response> {
    async move {
        let body = json!({ "data": ctx.data, "models": ctx.models });
        ctx.respond().ok(Some(body))
    }
}

pub fn registry(store: &InMemoryRepository) -> Registry {
    Registry::new()
        .model("user", Arc::new(store.clone()))
        .model("post", Arc::new(store.clone()))
        .model("article", Arc::new(store.clone()))
        .middleware(
            "auth",
            FnMiddleware::new(|ctx: &mut RequestContext| {
                let ok = ctx.headers.get(header::AUTHORIZATION).is_some();
                if ok {
                    Flow::Next
                } else {
                    Flow::Respond(ctx.respond().error("UNAUTHORIZED", StatusCode::UNAUTHORIZED, None, None))
                }
            }),
        )
        .middleware(
            "tag",
            FnMiddleware::new(|ctx: &mut RequestContext| {
                ctx.data.insert("tagged".into(), json!(true));
                Flow::Next
            }),
        )
        .middleware("log", FnMiddleware::new(|_: &mut RequestContext| Flow::Next))
        .validator(
            "createUser",
            ValidatorSpec::new(
                ValidationSchema::new().field("name", FieldRules::new().required().rule("string", true)),
            ),
        )
        .validator(
            "createUserAll",
            ValidatorSpec::new(
                ValidationSchema::new()
                    .field("name", FieldRules::new().required().rule("string", true))
                    .field("age", FieldRules::new().required().rule("integer", true)),
            )
            .accumulate(),
        )
        .validator(
            "authorExists",
            ValidatorSpec::new(
                ValidationSchema::new()
                    .field("authorId", FieldRules::new().required().rule("exists", "user")),
            ),
        )
        .policy(
            "post",
            FnPolicy::new()
                .method("update", |ctx| {
                    let author = ctx.model("post").and_then(|p| p.get("authorId")).map(Value::to_string);
                    let actor = ctx.input("actor").and_then(Value::as_str).map(str::to_string);
                    author.is_some() && author == actor
                })
                .method("view", |_| true),
        )
        .controller(
            "users",
            FnController::new()
                .action("show", echo)
                .action("store", echo)
                .action("index", echo),
        )
        .controller("posts", FnController::new().action("show", echo).action("update", echo))
}

pub fn app() -> Arc<App> {
    app_with(Settings::default())
}

pub fn app_with(settings: Settings) -> Arc<App> {
    App::new(settings, registry(&store())).unwrap()
}

/// Send one request through `router` and decode the JSON envelope.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with(router, method, uri, body, &[]).await
}

pub async fn send_with(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
