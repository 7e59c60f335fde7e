//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, tower-http layers: request id, trace,
//!       timeout, body limit, panic guard)
//!     → compiled route tree (routing + pipeline)
//!         → request.rs (request id, query/body parsing, data bag)
//!         → response.rs (JSON envelope, error catalog)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::Responder;
pub use server::HttpServer;
