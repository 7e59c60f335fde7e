//! Configuration schema definitions.
//!
//! This module defines the settings an application hands to [`crate::App`].
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Root configuration for a route-builder application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Validation engine defaults.
    pub validation: ValidationConfig,

    /// Symbolic error code → numeric error code catalog used in error bodies.
    pub errors: HashMap<String, i64>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Validation engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Stop at the first failing rule unless a validator says otherwise.
    pub stop_on_first_error: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            stop_on_first_error: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [validation]
            stop_on_first_error = false

            [errors]
            MODEL_NOT_FOUND = 4040
            "#,
        )
        .unwrap();

        assert!(!settings.validation.stop_on_first_error);
        assert_eq!(settings.errors.get("MODEL_NOT_FOUND"), Some(&4040));
        assert_eq!(settings.server.request_timeout_secs, 30);
        assert_eq!(settings.observability.log_level, "info");
    }
}
