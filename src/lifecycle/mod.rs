//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast to every subscriber → server stops accepting,
//!     drains in-flight requests, returns
//!
//! Signals (signals.rs):
//!     SIGINT / SIGTERM → Shutdown::trigger()
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - Signal handling lives in the binary's task, not in library code paths

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
