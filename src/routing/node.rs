//! A single endpoint: method, URI template, action, and its own attributes.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use axum::http::Method;
use axum::response::IntoResponse;

use crate::app::App;
use crate::binding::{self, Binder, BinderStage};
use crate::error::RouterError;
use crate::pipeline::{MiddlewareStage, Pipeline, PolicyStage, RequestContext, RouteInfo, ValidatorStage};
use crate::policy;
use crate::registry::{handler, Handler};
use crate::routing::attribute::{
    join_path, Attribute, MiddlewareRef, PolicyRef, PrefixChain, Scope, ValidatorRef,
};
use crate::routing::NativeRouter;
use crate::validation::rules::exists_target;
use crate::validation::ValidatorSpec;

/// What a route runs once every stage has passed.
#[derive(Clone)]
pub enum Action {
    /// `controller@action`, resolved through the registry.
    Named { controller: String, action: String },
    Inline(Handler),
}

impl Action {
    /// Wrap an async closure as an inline action.
    pub fn handler<F, Fut, R>(f: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        Action::Inline(handler(f))
    }

    fn label(&self) -> String {
        match self {
            Action::Named { controller, action } => format!("controller:{controller}@{action}"),
            Action::Inline(_) => "controller:<inline>".to_string(),
        }
    }
}

impl From<&str> for Action {
    /// Splits on the first `@`. A string without one keeps an empty action
    /// and fails at build time.
    fn from(reference: &str) -> Self {
        let (controller, action) = reference.split_once('@').unwrap_or((reference, ""));
        Action::Named {
            controller: controller.to_string(),
            action: action.to_string(),
        }
    }
}

impl From<Handler> for Action {
    fn from(handler: Handler) -> Self {
        Action::Inline(handler)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One route in the tree.
///
/// Created by a [`RouteGroup`](crate::routing::RouteGroup) verb, which seeds
/// it with the group's attributes. Builder calls on the node add attributes
/// for this route only, after the inherited ones.
pub struct RouteNode {
    app: Arc<App>,
    method: Method,
    uri: String,
    action: Action,
    middlewares: Vec<MiddlewareRef>,
    validators: Vec<ValidatorRef>,
    policies: Vec<PolicyRef>,
    binders: Vec<Binder>,
    prefixes: PrefixChain,
    name: Option<String>,
}

impl RouteNode {
    pub(crate) fn new(
        app: Arc<App>,
        method: Method,
        uri: &str,
        action: Action,
        prefixes: PrefixChain,
    ) -> Self {
        Self {
            app,
            method,
            uri: uri.to_string(),
            action,
            middlewares: Vec::new(),
            validators: Vec::new(),
            policies: Vec::new(),
            binders: Vec::new(),
            prefixes,
            name: None,
        }
    }

    pub fn middleware(&mut self, middleware: impl Into<MiddlewareRef>) -> &mut Self {
        self.apply(&Attribute::Middleware(middleware.into()));
        self
    }

    pub fn validate(&mut self, validator: impl Into<ValidatorRef>) -> &mut Self {
        self.apply(&Attribute::Validator(validator.into()));
        self
    }

    pub fn policy(&mut self, policy: &str, method: &str) -> &mut Self {
        self.apply(&Attribute::Policy(PolicyRef::new(policy, method)));
        self
    }

    /// Bind `field` to an entity of `model`, overriding any implicit binder
    /// for the same field.
    pub fn bind(&mut self, field: &str, model: &str) -> &mut Self {
        self.apply(&Attribute::Binder(Binder::new(field, model)));
        self
    }

    /// Prepend to this route's own prefix, inside every group prefix.
    pub fn prefix(&mut self, prefix: &str) -> &mut Self {
        let depth = self.prefixes.depth();
        self.apply(&Attribute::Prefix {
            depth,
            segment: prefix.to_string(),
        });
        self
    }

    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn middlewares(&self) -> &[MiddlewareRef] {
        &self.middlewares
    }

    pub fn validators(&self) -> &[ValidatorRef] {
        &self.validators
    }

    pub fn policies(&self) -> &[PolicyRef] {
        &self.policies
    }

    /// Accumulated prefix, outermost group first.
    pub fn prefix_path(&self) -> String {
        self.prefixes.render()
    }

    /// Prefix plus URI template, markers untouched.
    pub fn full_uri(&self) -> String {
        join_path(&self.prefixes.render(), &self.uri)
    }

    /// The path as the native router sees it.
    pub fn native_path(&self) -> Result<String, RouterError> {
        binding::to_native_path(&self.full_uri())
    }

    /// Explicit binders, then implicit ones from the final URI.
    pub fn binders(&self) -> Vec<Binder> {
        binding::resolve_binders(&self.binders, &self.full_uri())
    }

    /// `ancestors` joined with this route's name, if it has one.
    pub fn full_name(&self, ancestors: &[String]) -> Option<String> {
        let name = self.name.as_ref()?;
        let mut parts: Vec<&str> = ancestors.iter().map(String::as_str).collect();
        parts.push(name);
        Some(parts.join("."))
    }

    /// Stage labels in execution order, as `compile` would build them.
    pub fn describe(&self) -> Result<Vec<String>, RouterError> {
        Ok(self.compile(&[])?.describe())
    }

    /// Resolve every reference and assemble the pipeline.
    pub fn compile(&self, ancestors: &[String]) -> Result<Pipeline, RouterError> {
        let registry = self.app.registry();
        let route = RouteInfo {
            method: self.method.clone(),
            path: self.native_path()?,
            name: self.full_name(ancestors),
        };

        let controller = self.resolve_action()?;
        let mut pipeline = Pipeline::new(
            route,
            self.app.responder(),
            self.app.settings().server.max_body_bytes,
            self.action.label(),
            controller,
        );

        for middleware in &self.middlewares {
            let inner = match middleware {
                MiddlewareRef::Named(name) => registry.resolve_middleware(name)?,
                MiddlewareRef::Inline(inner) => Arc::clone(inner),
            };
            pipeline.push(MiddlewareStage::new(middleware.name(), inner));
        }

        let default_stop = self.app.settings().validation.stop_on_first_error;
        for validator in &self.validators {
            let spec = match validator {
                ValidatorRef::Named(name) => registry.resolve_validator(name)?,
                ValidatorRef::Inline(spec) => Arc::clone(spec),
            };
            self.check_rules(validator.name(), &spec)?;
            pipeline.push(ValidatorStage::new(validator.name(), spec, default_stop, self.app.rules()));
        }

        for binder in self.binders() {
            let repository = registry.resolve_model(&binder.model)?;
            pipeline.push(BinderStage::new(binder, repository));
        }

        for PolicyRef { policy: name, method } in &self.policies {
            let resolved = policy::resolve(registry, name, method)?;
            pipeline.push(PolicyStage::new(name, method, resolved));
        }

        Ok(pipeline)
    }

    /// Compile and register on `router`.
    pub fn build_route(&self, router: &mut NativeRouter, ancestors: &[String]) -> Result<(), RouterError> {
        let pipeline = self.compile(ancestors)?;
        tracing::info!(
            method = %self.method,
            route = %pipeline.route().label(),
            path = %pipeline.route().path,
            stages = pipeline.len(),
            "Route registered"
        );
        router.register(pipeline)
    }

    fn resolve_action(&self) -> Result<Handler, RouterError> {
        let (controller_name, action) = match &self.action {
            Action::Inline(handler) => return Ok(Arc::clone(handler)),
            Action::Named { controller, action } => (controller, action),
        };
        if controller_name.is_empty() || action.is_empty() {
            let reference = if action.is_empty() {
                controller_name.clone()
            } else {
                format!("{controller_name}@{action}")
            };
            return Err(RouterError::InvalidAction(reference));
        }

        let controller = self.app.registry().resolve_controller(controller_name)?;
        if !controller.supports(action) {
            return Err(RouterError::UnknownAction {
                controller: controller_name.clone(),
                action: action.clone(),
            });
        }

        let action = Arc::new(action.clone());
        Ok(handler(move |ctx| {
            let controller = Arc::clone(&controller);
            let action = Arc::clone(&action);
            async move { controller.call(&action, ctx).await }
        }))
    }

    /// Every rule a schema names must exist, and `exists` must point at a
    /// registered model.
    fn check_rules(&self, validator: &str, spec: &ValidatorSpec) -> Result<(), RouterError> {
        let rules = self.app.rules();
        for (_, field_rules) in spec.schema.fields() {
            for (rule, params) in field_rules.checks() {
                if !rules.contains(rule) {
                    return Err(RouterError::UnknownRule {
                        validator: validator.to_string(),
                        rule: rule.to_string(),
                    });
                }
                if rule == "exists" {
                    let (model, _) = exists_target(params).ok_or_else(|| RouterError::UnknownRule {
                        validator: validator.to_string(),
                        rule: format!("exists({params})"),
                    })?;
                    self.app.registry().resolve_model(model)?;
                }
            }
        }
        Ok(())
    }
}

impl Scope for RouteNode {
    fn apply(&mut self, attribute: &Attribute) {
        match attribute {
            Attribute::Middleware(middleware) => self.middlewares.push(middleware.clone()),
            Attribute::Validator(validator) => self.validators.push(validator.clone()),
            Attribute::Policy(policy) => self.policies.push(policy.clone()),
            Attribute::Binder(binder) => self.binders.push(binder.clone()),
            Attribute::Prefix { depth, segment } => self.prefixes.prepend(*depth, segment),
        }
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("method", &self.method)
            .field("uri", &self.full_uri())
            .field("action", &self.action)
            .field("name", &self.name)
            .finish()
    }
}
