//! Binding markers in URI templates.
//!
//! `::user` marks a path parameter whose value is the identifier of a `user`
//! entity. `:id` is a plain parameter. Both become `{name}` on the native
//! router.

use crate::error::RouterError;

/// Prefix of a segment that binds a model.
pub const BINDING_MARKER: &str = "::";

/// A (field, model) pair: read `field` from the data bag, load a `model`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binder {
    pub field: String,
    pub model: String,
}

impl Binder {
    pub fn new(field: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            model: model.into(),
        }
    }
}

/// One binder per `::name` segment, field and model both `name`.
pub fn resolve_implicit_binders(uri: &str) -> Vec<Binder> {
    uri.split('/')
        .filter_map(|segment| segment.strip_prefix(BINDING_MARKER))
        .filter(|name| !name.is_empty())
        .map(|name| Binder::new(name, name))
        .collect()
}

/// Explicit binders in declaration order, then implicit ones for fields
/// no explicit binder claimed.
pub fn resolve_binders(explicit: &[Binder], uri: &str) -> Vec<Binder> {
    let mut binders = explicit.to_vec();
    for implicit in resolve_implicit_binders(uri) {
        if !binders.iter().any(|b| b.field == implicit.field) {
            binders.push(implicit);
        }
    }
    binders
}

/// Rewrite a fully prefixed URI into the native router's syntax.
///
/// The result starts with `/`, has no empty interior segments, and uses
/// `{name}` for every `::name` or `:name` segment.
pub fn to_native_path(uri: &str) -> Result<String, RouterError> {
    let mut path = String::with_capacity(uri.len() + 1);
    let segments: Vec<&str> = uri.split('/').filter(|s| !s.is_empty()).collect();

    for segment in &segments {
        path.push('/');
        let param = segment
            .strip_prefix(BINDING_MARKER)
            .or_else(|| segment.strip_prefix(':'));
        match param {
            Some("") => {
                return Err(RouterError::InvalidPath {
                    path: uri.to_string(),
                    reason: "parameter segment without a name",
                })
            }
            Some(name) => {
                path.push('{');
                path.push_str(name);
                path.push('}');
            }
            None => path.push_str(segment),
        }
    }

    if path.is_empty() {
        path.push('/');
    } else if uri.ends_with('/') && !segments.is_empty() {
        path.push('/');
    }
    Ok(path)
}
