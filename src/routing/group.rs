//! Route groups: shared attributes pushed eagerly onto every descendant.

use std::fmt;
use std::sync::Arc;
use axum::http::Method;

use crate::app::App;
use crate::binding::Binder;
use crate::error::RouterError;
use crate::routing::attribute::{Attribute, MiddlewareRef, PolicyRef, PrefixChain, Scope, ValidatorRef};
use crate::routing::{Action, NativeRouter, RouteNode};

/// A subtree of routes sharing prefix, middleware, validators, binders,
/// and policies.
///
/// Attributes are applied in declaration order. A child created after an
/// attribute receives it on creation; a child created before receives it
/// when the attribute is declared. Either way every route ends up with the
/// group's attributes ahead of its own.
pub struct RouteGroup {
    app: Arc<App>,
    prefixes: PrefixChain,
    history: Vec<Attribute>,
    nodes: Vec<RouteNode>,
    groups: Vec<RouteGroup>,
    name: Option<String>,
}

impl RouteGroup {
    /// An empty root group.
    pub fn new(app: Arc<App>) -> Self {
        Self::with_prefixes(app, PrefixChain::root())
    }

    fn with_prefixes(app: Arc<App>, prefixes: PrefixChain) -> Self {
        Self {
            app,
            prefixes,
            history: Vec::new(),
            nodes: Vec::new(),
            groups: Vec::new(),
            name: None,
        }
    }

    /// Add a route seeded with every attribute declared so far.
    pub fn route(&mut self, method: Method, uri: &str, action: impl Into<Action>) -> &mut RouteNode {
        let mut node = RouteNode::new(
            Arc::clone(&self.app),
            method,
            uri,
            action.into(),
            self.prefixes.nested(),
        );
        for attribute in &self.history {
            node.apply(attribute);
        }
        let index = self.nodes.len();
        self.nodes.push(node);
        &mut self.nodes[index]
    }

    pub fn get(&mut self, uri: &str, action: impl Into<Action>) -> &mut RouteNode {
        self.route(Method::GET, uri, action)
    }

    pub fn post(&mut self, uri: &str, action: impl Into<Action>) -> &mut RouteNode {
        self.route(Method::POST, uri, action)
    }

    pub fn put(&mut self, uri: &str, action: impl Into<Action>) -> &mut RouteNode {
        self.route(Method::PUT, uri, action)
    }

    pub fn patch(&mut self, uri: &str, action: impl Into<Action>) -> &mut RouteNode {
        self.route(Method::PATCH, uri, action)
    }

    pub fn delete(&mut self, uri: &str, action: impl Into<Action>) -> &mut RouteNode {
        self.route(Method::DELETE, uri, action)
    }

    /// Add a subgroup. It inherits everything declared so far, then `build`
    /// populates it.
    pub fn group<F>(&mut self, build: F) -> &mut RouteGroup
    where
        F: FnOnce(&mut RouteGroup),
    {
        let mut child = RouteGroup::with_prefixes(Arc::clone(&self.app), self.prefixes.nested());
        for attribute in &self.history {
            child.apply(attribute);
        }
        build(&mut child);

        let index = self.groups.len();
        self.groups.push(child);
        &mut self.groups[index]
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

    pub fn bind(&mut self, field: &str, model: &str) -> &mut Self {
        self.apply(&Attribute::Binder(Binder::new(field, model)));
        self
    }

    /// Prepend to this group's prefix. Outer group prefixes always stay in
    /// front, whenever they are declared.
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

    pub fn group_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Accumulated prefix of this group, outermost first.
    pub fn prefix_path(&self) -> String {
        self.prefixes.render()
    }

    pub fn routes(&self) -> &[RouteNode] {
        &self.nodes
    }

    pub fn groups(&self) -> &[RouteGroup] {
        &self.groups
    }

    pub fn middlewares(&self) -> Vec<&MiddlewareRef> {
        self.history
            .iter()
            .filter_map(|a| match a {
                Attribute::Middleware(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn validators(&self) -> Vec<&ValidatorRef> {
        self.history
            .iter()
            .filter_map(|a| match a {
                Attribute::Validator(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn policies(&self) -> Vec<&PolicyRef> {
        self.history
            .iter()
            .filter_map(|a| match a {
                Attribute::Policy(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn binders(&self) -> Vec<&Binder> {
        self.history
            .iter()
            .filter_map(|a| match a {
                Attribute::Binder(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Compile this tree onto `router`, or onto a fresh one.
    pub fn build_router(
        &self,
        router: Option<NativeRouter>,
        ancestors: &[String],
    ) -> Result<NativeRouter, RouterError> {
        let mut router = router.unwrap_or_default();
        self.build_into(&mut router, ancestors)?;
        Ok(router)
    }

    /// Register own routes first, then recurse into subgroups.
    ///
    /// `ancestors` is copied before this group's name is added, so sibling
    /// subtrees never see each other's names.
    pub fn build_into(
        &self,
        router: &mut NativeRouter,
        ancestors: &[String],
    ) -> Result<(), RouterError> {
        let mut names = ancestors.to_vec();
        if let Some(name) = &self.name {
            names.push(name.clone());
        }

        for node in &self.nodes {
            node.build_route(router, &names)?;
        }
        for group in &self.groups {
            group.build_into(router, &names)?;
        }
        Ok(())
    }

    fn propagate(&mut self, attribute: &Attribute) {
        for node in &mut self.nodes {
            node.apply(attribute);
        }
        for group in &mut self.groups {
            group.apply(attribute);
        }
    }
}

impl Scope for RouteGroup {
    fn apply(&mut self, attribute: &Attribute) {
        match attribute {
            Attribute::Prefix { depth, segment } => self.prefixes.prepend(*depth, segment),
            other => self.history.push(other.clone()),
        }
        self.propagate(attribute);
    }
}

impl fmt::Debug for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGroup")
            .field("name", &self.name)
            .field("prefix", &self.prefix_path())
            .field("routes", &self.nodes)
            .field("groups", &self.groups)
            .finish()
    }
}
