//! Request pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! native router match
//!     → executor.rs: bootstrap (path params, query, body → data bag)
//!     → stage.rs / binding: middleware → validators → binders → policies
//!         → Flow::Respond : answer now, later stages never run
//!         → Flow::Next    : continue
//!     → controller (terminal handler)
//! ```
//!
//! # Design Decisions
//! - Each route compiles its own pipeline once; requests only walk a Vec
//! - Stages communicate through `RequestContext`, never through globals
//! - Per-request failures are responses; build failures are `RouterError`

pub mod context;
pub mod executor;
pub mod stage;

pub use context::{BoundModels, Flow, RequestContext, RouteInfo};
pub use executor::Pipeline;
pub use stage::{MiddlewareStage, PolicyStage, Stage, StageKind, ValidatorStage};
