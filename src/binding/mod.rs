//! Model binding subsystem.
//!
//! # Data Flow
//! ```text
//! fully prefixed URI "/api/::user/posts/::post"
//!     → resolver.rs: implicit binders (user,user) (post,post)
//!     → merged after explicit bind(field, model) calls
//!     → stage.rs: one BinderStage per binder
//!         → identifier missing : 400 MISSING_IDENTIFIER
//!         → not found / error  : 404 MODEL_NOT_FOUND {modelName}
//!         → found              : ctx.models[model] = entity
//! ```
//!
//! # Design Decisions
//! - Markers are scanned once, on the final path, never on partial prefixes
//! - An explicit binder for a field replaces the implicit one for that field
//! - Repository errors never leak; they read as "not found"

pub mod resolver;
pub mod stage;

pub use resolver::{resolve_binders, resolve_implicit_binders, to_native_path, Binder, BINDING_MARKER};
pub use stage::BinderStage;
