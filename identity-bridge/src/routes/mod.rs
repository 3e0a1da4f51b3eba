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

//! Axum router configuration for the identity bridge.

pub mod admin;
pub mod oauth;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        // Discord login -> Firebase custom token
        .route("/auth", get(oauth::auth))
        .route("/api/discord", get(oauth::auth))
        // Dashboard admin screen
        .route("/api/auth", post(admin::login))
}
