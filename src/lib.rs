//! Declarative route trees compiled onto axum.
//!
//! Routes are declared as nested groups carrying prefixes, middleware,
//! validators, model binders, and policies. Building the tree resolves every
//! name through the [`Registry`], fixes each route's stage order, and
//! registers one pipeline per route on an `axum::Router`.
//!
//! ```no_run
//! use route_builder::{App, Registry, Settings};
//!
//! # fn demo(registry: Registry) -> Result<(), Box<dyn std::error::Error>> {
//! let app = App::new(Settings::default(), registry)?;
//! let mut api = App::router(&app);
//! api.prefix("/api").middleware("auth");
//! api.get("/users/::user", "users@show");
//! let router = app.build_routers(&[api])?;
//! # let _ = router;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod binding;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod persistence;
pub mod pipeline;
pub mod policy;
pub mod registry;
pub mod routing;
pub mod validation;

pub use app::App;
pub use config::Settings;
pub use error::RouterError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{Flow, RequestContext};
pub use registry::Registry;
pub use routing::{Action, RouteGroup, RouteNode};
