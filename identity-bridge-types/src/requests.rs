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

//! Request types: query parameters and bodies accepted by the bridge.

use serde::{Deserialize, Serialize};

/// Query string of `GET /auth`.
///
/// `code` is the authorization code the provider appended to the redirect.
/// Its absence selects the "issue login URL" mode.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuthQuery {
    #[serde(default)]
    pub code: Option<String>,
}

/// Request body for `POST /api/auth`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminLoginRequest {
    pub password: String,
}
