//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! App bootstrap
//!     → logging.rs (tracing subscriber, level from [observability])
//!     → metrics.rs (Prometheus exporter when enabled)
//!
//! Per request:
//!     → tower-http TraceLayer span (method, uri, x-request-id)
//!     → Pipeline::execute records one counter + one histogram sample
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never formatted strings alone
//! - Metric calls are no-ops until a recorder is installed, so tests and
//!   embedders pay nothing
//! - `RUST_LOG` overrides the configured level

pub mod logging;
pub mod metrics;
