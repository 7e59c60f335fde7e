//! Response helpers.
//!
//! # Responsibilities
//! - Serialize the JSON envelope every stage and controller answers with
//! - Translate symbolic error codes through the configured error catalog
//! - Map each per-request failure kind to its status code
//!
//! # Design Decisions
//! - Envelope is `{"ok": true, "data": ...}` or
//!   `{"ok": false, "errorCode": ..., "msg": ..., "data": ...}`
//! - Unknown symbolic codes are sent as the symbol itself
//! - Each helper builds a complete response; sending it is the caller's job

use std::collections::HashMap;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::validation::ValidationErrors;

/// Symbolic error codes emitted by the pipeline itself.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const POLICY_DENIED: &str = "POLICY_DENIED";
    pub const MODEL_NOT_FOUND: &str = "MODEL_NOT_FOUND";
    pub const MISSING_IDENTIFIER: &str = "MISSING_IDENTIFIER";
    pub const MALFORMED_BODY: &str = "MALFORMED_BODY";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// Builds the JSON responses stages and controllers send.
#[derive(Debug, Clone, Default)]
pub struct Responder {
    catalog: HashMap<String, i64>,
}

impl Responder {
    /// Create a responder with a symbolic → numeric error catalog.
    pub fn new(catalog: HashMap<String, i64>) -> Self {
        Self { catalog }
    }

    /// `200 {"ok": true, "data": ...}`.
    pub fn ok(&self, data: Option<Value>) -> Response {
        let body = Envelope {
            ok: true,
            error_code: None,
            msg: None,
            data,
        };
        (StatusCode::OK, Json(body)).into_response()
    }

    /// Error envelope with the given status.
    pub fn error(
        &self,
        code: &str,
        status: StatusCode,
        msg: Option<&str>,
        data: Option<Value>,
    ) -> Response {
        let body = Envelope {
            ok: false,
            error_code: Some(self.error_code(code)),
            msg,
            data,
        };
        (status, Json(body)).into_response()
    }

    /// `422` carrying the field → failed rules map.
    pub fn validation_error(&self, errors: &ValidationErrors) -> Response {
        self.error(
            codes::VALIDATION_ERROR,
            StatusCode::UNPROCESSABLE_ENTITY,
            None,
            Some(json!(errors)),
        )
    }

    /// `403` naming the policy check that denied the request.
    pub fn policy_error(&self, policy: &str, method: &str) -> Response {
        self.error(
            codes::POLICY_DENIED,
            StatusCode::FORBIDDEN,
            None,
            Some(json!({ "policyName": policy, "policyMethod": method })),
        )
    }

    /// Numeric code from the catalog, or the symbol itself.
    pub fn error_code(&self, code: &str) -> Value {
        match self.catalog.get(code) {
            Some(n) => Value::from(*n),
            None => Value::from(code),
        }
    }
}
