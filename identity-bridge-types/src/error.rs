/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Error body returned by `GET /auth` on failure.
//!
//! The shape is flat (`{"error": ..., ...}`) because the dashboard reads
//! `error` directly; `details` and `message` appear only when they apply.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable summary.
    pub error: String,

    /// Raw payload from the identity provider, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// Underlying cause of an internal fault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub const TOKEN_EXCHANGE_FAILED: &'static str = "Failed to get discord token";
    pub const MISSING_CREDENTIALS: &'static str = "Server config error (Missing Firebase Creds)";
    pub const SERVER_ERROR: &'static str = "Server Error";

    pub fn token_exchange_failed(details: Value) -> Self {
        Self {
            error: Self::TOKEN_EXCHANGE_FAILED.to_string(),
            details: Some(details),
            message: None,
        }
    }

    pub fn missing_credentials() -> Self {
        Self {
            error: Self::MISSING_CREDENTIALS.to_string(),
            details: None,
            message: None,
        }
    }

    pub fn server_error(message: &str) -> Self {
        Self {
            error: Self::SERVER_ERROR.to_string(),
            details: None,
            message: Some(message.to_string()),
        }
    }
}
