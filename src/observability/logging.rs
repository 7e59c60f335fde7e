//! Structured logging.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_DIRECTIVES: &str = "route_builder=info,tower_http=info";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level`. Fails if a subscriber is already set.
pub fn init(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(level)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// `debug` becomes `route_builder=debug,tower_http=debug`.
fn filter_for(level: &str) -> EnvFilter {
    if level.is_empty() {
        EnvFilter::new(DEFAULT_DIRECTIVES)
    } else {
        EnvFilter::new(format!("route_builder={level},tower_http={level}"))
    }
}
