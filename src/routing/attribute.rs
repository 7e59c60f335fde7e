//! Attributes a group hands down to its routes and subgroups.

use std::fmt;
use std::sync::Arc;

use crate::binding::Binder;
use crate::registry::Middleware;
use crate::validation::ValidatorSpec;

/// A middleware by registry name, or an implementation given inline.
#[derive(Clone)]
pub enum MiddlewareRef {
    Named(String),
    Inline(Arc<dyn Middleware>),
}

impl MiddlewareRef {
    pub fn inline(middleware: impl Middleware + 'static) -> Self {
        MiddlewareRef::Inline(Arc::new(middleware))
    }

    pub fn name(&self) -> &str {
        match self {
            MiddlewareRef::Named(name) => name,
            MiddlewareRef::Inline(_) => "<inline>",
        }
    }
}

impl From<&str> for MiddlewareRef {
    fn from(name: &str) -> Self {
        MiddlewareRef::Named(name.to_string())
    }
}

impl From<String> for MiddlewareRef {
    fn from(name: String) -> Self {
        MiddlewareRef::Named(name)
    }
}

impl fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Middleware({})", self.name())
    }
}

/// A validator by registry name, or a spec given inline.
#[derive(Debug, Clone)]
pub enum ValidatorRef {
    Named(String),
    Inline(Arc<ValidatorSpec>),
}

impl ValidatorRef {
    pub fn name(&self) -> &str {
        match self {
            ValidatorRef::Named(name) => name,
            ValidatorRef::Inline(_) => "<inline>",
        }
    }
}

impl From<&str> for ValidatorRef {
    fn from(name: &str) -> Self {
        ValidatorRef::Named(name.to_string())
    }
}

impl From<String> for ValidatorRef {
    fn from(name: String) -> Self {
        ValidatorRef::Named(name)
    }
}

impl From<ValidatorSpec> for ValidatorRef {
    fn from(spec: ValidatorSpec) -> Self {
        ValidatorRef::Inline(Arc::new(spec))
    }
}

/// A policy name plus the method to evaluate on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRef {
    pub policy: String,
    pub method: String,
}

impl PolicyRef {
    pub fn new(policy: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            method: method.into(),
        }
    }
}

/// Something a scope can be told to carry.
#[derive(Debug, Clone)]
pub(crate) enum Attribute {
    Middleware(MiddlewareRef),
    Validator(ValidatorRef),
    Policy(PolicyRef),
    Binder(Binder),
    /// Prepend `segment` to the prefix layer owned by the group at `depth`.
    Prefix { depth: usize, segment: String },
}

/// Anything that can receive attributes: routes and groups.
pub(crate) trait Scope {
    fn apply(&mut self, attribute: &Attribute);
}

/// Prefix layers, one per nesting level, outermost first.
///
/// Each group owns the layer at its depth, and a route owns the last one.
/// Layers are joined in depth order, so the final URI does not depend on
/// when a prefix was declared relative to its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrefixChain(Vec<String>);

impl PrefixChain {
    /// Chain for a root group.
    pub(crate) fn root() -> Self {
        PrefixChain(vec![String::new()])
    }

    /// Chain for a scope nested one level deeper, starting with an empty layer.
    pub(crate) fn nested(&self) -> Self {
        let mut layers = self.0.clone();
        layers.push(String::new());
        PrefixChain(layers)
    }

    /// Depth of the innermost layer.
    pub(crate) fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub(crate) fn prepend(&mut self, depth: usize, segment: &str) {
        if let Some(layer) = self.0.get_mut(depth) {
            *layer = join_path(segment, layer);
        }
    }

    pub(crate) fn render(&self) -> String {
        self.0.iter().fold(String::new(), |acc, layer| join_path(&acc, layer))
    }
}

/// Join two path fragments with exactly one `/` between them.
pub(crate) fn join_path(left: &str, right: &str) -> String {
    if left.is_empty() {
        return right.to_string();
    }
    if right.is_empty() {
        return left.to_string();
    }
    match (left.ends_with('/'), right.starts_with('/')) {
        (true, true) => format!("{left}{}", &right[1..]),
        (false, false) => format!("{left}/{right}"),
        _ => format!("{left}{right}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_layers_compose_by_depth() {
        let mut root = PrefixChain::root();
        let mut child = root.nested();
        let mut leaf = child.nested();

        // Inner layers first, outer layers later: order still holds.
        leaf.prepend(2, "/c");
        child.prepend(1, "b");
        leaf.prepend(1, "b");
        root.prepend(0, "a");
        child.prepend(0, "a");
        leaf.prepend(0, "a");

        assert_eq!(leaf.render(), "a/b/c");
        assert_eq!(child.render(), "a/b");
        assert_eq!(root.render(), "a");
        assert_eq!(leaf.depth(), 2);
    }

    #[test]
    fn test_prepend_stacks_within_a_layer() {
        let mut chain = PrefixChain::root();
        chain.prepend(0, "/users");
        chain.prepend(0, "/api");
        assert_eq!(chain.render(), "/api/users");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/api/", "/users"), "/api/users");
        assert_eq!(join_path("api", "users"), "api/users");
        assert_eq!(join_path("", "/users"), "/users");
        assert_eq!(join_path("/api", ""), "/api");
    }

    #[test]
    fn test_ref_names() {
        assert_eq!(MiddlewareRef::from("auth").name(), "auth");
        assert_eq!(ValidatorRef::from("createUser").name(), "createUser");
    }
}
