//! route-builder demo server.
//!
//! Serves a small users/posts API declared as a route tree:
//!
//! ```text
//! GET    /api/health                         inline handler
//! GET    /api/users/{user}                   users@show      (binds user)
//! POST   /api/users                          users@store     auth, createUser
//! GET    /api/users/{user}/posts/{post}      posts@show      (binds user, post)
//! PUT    /api/users/{user}/posts/{post}      posts@update    auth, updatePost, post@update
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use axum::http::{header, StatusCode};
use clap::Parser;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use route_builder::config::{load_config, Settings};
use route_builder::http::HttpServer;
use route_builder::lifecycle::{shutdown_signal, Shutdown};
use route_builder::observability::{logging, metrics};
use route_builder::persistence::InMemoryRepository;
use route_builder::policy::FnPolicy;
use route_builder::registry::{FnController, FnMiddleware, Registry};
use route_builder::validation::{FieldRules, ValidationSchema, ValidatorSpec};
use route_builder::{Action, App, Flow, RequestContext, RouteGroup};

#[derive(Parser, Debug)]
#[command(name = "route-builder", version, about = "Serve the demo route tree")]
struct Args {
    /// TOML settings file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `[server] bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_config(path)?,
        None => Settings::default(),
    };
    if let Some(bind) = args.bind {
        settings.server.bind_address = bind;
    }

    logging::init(&settings.observability.log_level)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "route-builder starting");

    let store = InMemoryRepository::new();
    seed(&store);

    let app = App::new(settings, registry(&store))?;
    let settings = app.settings();
    tracing::info!(
        bind_address = %settings.server.bind_address,
        request_timeout_secs = settings.server.request_timeout_secs,
        max_body_bytes = settings.server.max_body_bytes,
        "Configuration loaded"
    );

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let routes = app.build_routers(&[api(&app)])?;
    let server = HttpServer::new(routes, &settings.server, app.responder());

    let listener = TcpListener::bind(&settings.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let serving = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown_signal().await;
    shutdown.trigger();
    serving.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn seed(store: &InMemoryRepository) {
    store.insert("user", "1", json!({ "id": 1, "name": "ada" }));
    store.insert("post", "1", json!({ "id": 1, "title": "Hello", "authorId": 1 }));
}

fn registry(store: &InMemoryRepository) -> Registry {
    let users = store.clone();
    let posts = store.clone();

    Registry::new()
        .model("user", Arc::new(store.clone()))
        .model("post", Arc::new(store.clone()))
        .middleware(
            "auth",
            FnMiddleware::new(|ctx: &mut RequestContext| {
                let authorized = ctx
                    .headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v == "Bearer demo");
                if authorized {
                    Flow::Next
                } else {
                    Flow::Respond(ctx.respond().error("UNAUTHORIZED", StatusCode::UNAUTHORIZED, None, None))
                }
            }),
        )
        .validator(
            "createUser",
            ValidatorSpec::new(
                ValidationSchema::new()
                    .field(
                        "name",
                        FieldRules::new()
                            .required()
                            .rule("string", true)
                            .rule("lBetween", json!([2, 50])),
                    )
                    .field("age", FieldRules::new().rule("integer", true).rule("between", json!([0, 150]))),
            ),
        )
        .validator(
            "updatePost",
            ValidatorSpec::new(
                ValidationSchema::new().field("title", FieldRules::new().required().rule("string", true)),
            )
            .accumulate(),
        )
        .policy(
            "post",
            FnPolicy::new().method("update", |ctx| {
                let author = ctx.model("post").and_then(|p| p.get("authorId"));
                let owner = ctx.model("user").and_then(|u| u.get("id"));
                author.is_some() && author == owner
            }),
        )
        .controller(
            "users",
            FnController::new()
                .action("show", |ctx: RequestContext| async move {
                    let user = ctx.model("user").cloned();
                    ctx.respond().ok(user)
                })
                .action("store", move |ctx: RequestContext| {
                    let users = users.clone();
                    async move {
                        let id = users.count("user") + 1;
                        let user = json!({ "id": id, "name": ctx.input("name"), "age": ctx.input("age") });
                        users.insert("user", id.to_string(), user.clone());
                        (StatusCode::CREATED, ctx.respond().ok(Some(user)))
                    }
                }),
        )
        .controller(
            "posts",
            FnController::new()
                .action("show", |ctx: RequestContext| async move {
                    let post = ctx.model("post").cloned().unwrap_or(Value::Null);
                    let author = ctx.model("user").cloned().unwrap_or(Value::Null);
                    ctx.respond().ok(Some(json!({ "post": post, "author": author })))
                })
                .action("update", move |ctx: RequestContext| {
                    let posts = posts.clone();
                    async move {
                        let mut post = ctx.model("post").cloned().unwrap_or_else(|| json!({}));
                        if let (Some(fields), Some(title)) = (post.as_object_mut(), ctx.input("title")) {
                            fields.insert("title".into(), title.clone());
                        }
                        let id = ctx.input("post").and_then(Value::as_str).unwrap_or_default().to_string();
                        posts.insert("post", id, post.clone());
                        ctx.respond().ok(Some(post))
                    }
                }),
        )
}

fn api(app: &Arc<App>) -> RouteGroup {
    let mut api = App::router(app);
    api.prefix("/api").name("api");

    api.get(
        "/health",
        Action::handler(|ctx: RequestContext| async move {
            ctx.respond().ok(Some(json!({ "status": "ok" })))
        }),
    )
    .name("health");

    api.group(|users| {
        users.prefix("/users").name("users");
        users.get("/::user", "users@show").name("show");
        users
            .post("", "users@store")
            .name("store")
            .middleware("auth")
            .validate("createUser");

        users.group(|posts| {
            posts.prefix("/::user/posts").name("posts");
            posts.get("/::post", "posts@show").name("show");
            posts
                .put("/::post", "posts@update")
                .name("update")
                .middleware("auth")
                .validate("updatePost")
                .policy("post", "update");
        });
    });

    api
}
