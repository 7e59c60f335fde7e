//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declaration (at startup):
//!     App::router() → RouteGroup
//!     → group.prefix/middleware/validate/bind/policy (attribute.rs)
//!         → recorded in order, pushed onto every existing child
//!     → group.get/post/.../group(..) (group.rs)
//!         → new child replays the recorded attributes
//!     → node-local attributes (node.rs), after the inherited ones
//!
//! Route compilation:
//!     RouteGroup::build_router(None, &[])
//!     → per node: final URI, implicit binders, name resolution
//!     → Pipeline (bootstrap → middleware → validators → binders → policies → controller)
//!     → native.rs: register on axum::Router
//! ```
//!
//! # Design Decisions
//! - Attributes are pushed eagerly, never looked up from parents at request time
//! - Prefixes live in per-depth layers so outer prefixes stay outermost
//! - Every symbolic name is resolved during compilation; a bad name fails the build
//! - The compiled router is immutable

pub mod attribute;
pub mod group;
pub mod native;
pub mod node;

pub use attribute::{MiddlewareRef, PolicyRef, ValidatorRef};
pub use group::RouteGroup;
pub use native::NativeRouter;
pub use node::{Action, RouteNode};
