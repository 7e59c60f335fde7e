//! Symbolic-name resolution.
//!
//! # Data Flow
//! ```text
//! application bootstrap
//!     → Registry::new().controller(..).middleware(..).policy(..)...
//!     → App::new(settings, registry)     (frozen, shared via Arc)
//!     → RouteNode compile resolves every name it holds
//!         → found   : typed Arc handle baked into the stage
//!         → missing : RouterError::Unresolved (build fails)
//! ```
//!
//! # Design Decisions
//! - One typed map per kind instead of reflection on names
//! - Resolution happens once, at compile time, never per request
//! - Inline references bypass the registry entirely

pub mod controller;
pub mod middleware;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RouterError;
use crate::persistence::Repository;
use crate::policy::Policy;
use crate::validation::{Rule, ValidatorSpec};

pub use controller::{handler, Controller, FnController, Handler};
pub use middleware::{FnMiddleware, Middleware};

/// Model name → repository holding entities of that model.
pub type Models = HashMap<String, Arc<dyn Repository>>;

/// Name → implementation tables for everything a route tree refers to by name.
#[derive(Default)]
pub struct Registry {
    controllers: HashMap<String, Arc<dyn Controller>>,
    middlewares: HashMap<String, Arc<dyn Middleware>>,
    validators: HashMap<String, Arc<ValidatorSpec>>,
    policies: HashMap<String, Arc<dyn Policy>>,
    models: Models,
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(mut self, name: impl Into<String>, controller: impl Controller + 'static) -> Self {
        self.controllers.insert(name.into(), Arc::new(controller));
        self
    }

    pub fn middleware(mut self, name: impl Into<String>, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.insert(name.into(), Arc::new(middleware));
        self
    }

    pub fn validator(mut self, name: impl Into<String>, spec: ValidatorSpec) -> Self {
        self.validators.insert(name.into(), Arc::new(spec));
        self
    }

    pub fn policy(mut self, name: impl Into<String>, policy: impl Policy + 'static) -> Self {
        self.policies.insert(name.into(), Arc::new(policy));
        self
    }

    /// Register a model backed by `repository`. One repository may back many models.
    pub fn model(mut self, name: impl Into<String>, repository: Arc<dyn Repository>) -> Self {
        self.models.insert(name.into(), repository);
        self
    }

    /// Register a validation rule available to every validator.
    pub fn rule(mut self, name: impl Into<String>, rule: impl Rule + 'static) -> Self {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    pub fn resolve_controller(&self, name: &str) -> Result<Arc<dyn Controller>, RouterError> {
        lookup(&self.controllers, "controllers", name)
    }

    pub fn resolve_middleware(&self, name: &str) -> Result<Arc<dyn Middleware>, RouterError> {
        lookup(&self.middlewares, "middlewares", name)
    }

    pub fn resolve_validator(&self, name: &str) -> Result<Arc<ValidatorSpec>, RouterError> {
        lookup(&self.validators, "validators", name)
    }

    pub fn resolve_policy(&self, name: &str) -> Result<Arc<dyn Policy>, RouterError> {
        lookup(&self.policies, "policies", name)
    }

    pub fn resolve_model(&self, name: &str) -> Result<Arc<dyn Repository>, RouterError> {
        lookup(&self.models, "models", name)
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub(crate) fn rules(&self) -> impl Iterator<Item = (&String, &Arc<dyn Rule>)> {
        self.rules.iter()
    }
}

fn lookup<T: ?Sized>(
    table: &HashMap<String, Arc<T>>,
    kind: &'static str,
    name: &str,
) -> Result<Arc<T>, RouterError> {
    table.get(name).cloned().ok_or_else(|| RouterError::Unresolved {
        kind,
        name: name.to_string(),
    })
}
