//! The configuration root every route tree hangs off.

use std::sync::Arc;
use axum::Router;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, Settings};
use crate::error::RouterError;
use crate::http::response::Responder;
use crate::registry::Registry;
use crate::routing::{NativeRouter, RouteGroup};
use crate::validation::RuleSet;

/// Validated settings plus the frozen name registry.
///
/// Route groups and nodes hold an `Arc<App>`, so a tree cannot exist before
/// the app is initialized.
pub struct App {
    settings: Settings,
    registry: Registry,
    rules: Arc<RuleSet>,
    responder: Arc<Responder>,
}

impl App {
    pub fn new(settings: Settings, registry: Registry) -> Result<Arc<Self>, ConfigError> {
        validate_config(&settings).map_err(ConfigError::Validation)?;

        let mut rules = RuleSet::with_models(Arc::new(registry.models().clone()));
        for (name, rule) in registry.rules() {
            rules.insert_shared(name.clone(), Arc::clone(rule));
        }
        let responder = Responder::new(settings.errors.clone());

        Ok(Arc::new(Self {
            settings,
            registry,
            rules: Arc::new(rules),
            responder: Arc::new(responder),
        }))
    }

    /// A fresh root group bound to `app`.
    pub fn router(app: &Arc<App>) -> RouteGroup {
        RouteGroup::new(Arc::clone(app))
    }

    /// Compile several independent trees onto one router, in order.
    pub fn build_routers(&self, groups: &[RouteGroup]) -> Result<Router, RouterError> {
        let mut router = NativeRouter::new();
        for group in groups {
            group.build_into(&mut router, &[])?;
        }
        tracing::info!(routes = router.len(), trees = groups.len(), "Route trees compiled");
        Ok(router.into_axum())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Standard rules, `exists`, and every rule from the registry.
    pub fn rules(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules)
    }

    pub fn responder(&self) -> Arc<Responder> {
        Arc::clone(&self.responder)
    }
}
