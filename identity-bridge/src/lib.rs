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

//! Discord login to Firebase custom token bridge.
//!
//! This crate provides the Axum router, application state, and configuration
//! for the bridge service. The binary entry point (`main.rs`) is a thin
//! wrapper that calls into this library.

pub mod allowlist;
pub mod auth;
pub mod b64;
pub mod config;
pub mod error;
pub mod keys;
pub mod oauth;
pub mod routes;
pub mod state;
pub mod token;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full service: routes plus the middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
