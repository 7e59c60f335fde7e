//! Build-time errors for the route tree.
//!
//! Everything here is a configuration error: it is raised while a tree is
//! compiled onto the native router, before any request is served. Per-request
//! failures (validation, binding, policy denial) are responses, not errors.

use thiserror::Error;

/// Errors raised while compiling a route tree.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A symbolic name has no entry in the registry.
    #[error("no {kind} registered under the name `{name}`")]
    Unresolved { kind: &'static str, name: String },

    /// The controller exists but does not answer to the action.
    #[error("controller `{controller}` has no action `{action}`")]
    UnknownAction { controller: String, action: String },

    /// Action strings must look like `controller@action`.
    #[error("invalid action `{0}`, expected `controller@action`")]
    InvalidAction(String),

    /// The policy exists but does not answer to the method.
    #[error("policy `{policy}` has no method `{method}`")]
    UnknownPolicyMethod { policy: String, method: String },

    /// A validator schema names a rule nobody implements.
    #[error("validator `{validator}` uses unknown rule `{rule}`")]
    UnknownRule { validator: String, rule: String },

    /// The same method and path were registered twice.
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: String, path: String },

    /// Same path shape as an existing route but different parameter names.
    #[error("route {path} conflicts with already registered {existing}")]
    ConflictingRoute { path: String, existing: String },

    /// The method cannot be mapped onto the native router.
    #[error("unsupported HTTP method `{0}`")]
    UnsupportedMethod(String),

    /// The computed path cannot be registered.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },
}
