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

//! Success and outcome bodies returned by the bridge endpoints.

use serde::{Deserialize, Serialize};

use crate::profile::ExternalProfile;

/// `GET /auth` without a code: where to send the browser.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthUrlResponse {
    pub url: String,
}

/// `GET /auth?code=...` for an allow-listed account (200).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginSuccessResponse {
    pub success: bool,
    pub firebase_token: String,
    pub user: ExternalProfile,
}

impl LoginSuccessResponse {
    pub fn new(firebase_token: String, user: ExternalProfile) -> Self {
        Self {
            success: true,
            firebase_token,
            user,
        }
    }
}

/// `GET /auth?code=...` for an account not on the allow-list (403).
///
/// The profile is echoed back so the caller can show which identity was rejected.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginDeniedResponse {
    pub success: bool,
    pub error: String,
    pub user: ExternalProfile,
}

impl LoginDeniedResponse {
    pub const UNAUTHORIZED_USER: &'static str = "Unauthorized user";

    pub fn new(user: ExternalProfile) -> Self {
        Self {
            success: false,
            error: Self::UNAUTHORIZED_USER.to_string(),
            user,
        }
    }
}

/// Body of every `POST /api/auth` response.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminLoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AdminLoginResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}
