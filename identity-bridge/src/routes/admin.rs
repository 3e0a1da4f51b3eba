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

//! `POST /api/auth`: admin password check for the dashboard.
//!
//! Stateless: the response only says whether the password matched. The
//! dashboard keeps track of the result itself.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use identity_bridge_types::requests::AdminLoginRequest;
use identity_bridge_types::responses::AdminLoginResponse;
use tokio::task::JoinError;

use crate::state::AppState;

/// POST /api/auth
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<AdminLoginResponse>) {
    let Some(admin) = state.admin_password.as_ref() else {
        tracing::error!("Admin login attempted but ADMIN_PASSWORD is not set");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AdminLoginResponse::rejected("Admin login not configured")),
        );
    };

    let Ok(request) = serde_json::from_slice::<AdminLoginRequest>(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(AdminLoginResponse::rejected("Invalid request body")),
        );
    };

    // Argon2 is CPU-bound: run it on the blocking pool.
    let admin = admin.clone();
    let verified = tokio::task::spawn_blocking(move || admin.verify(&request.password)).await;
    verification_response(verified)
}

fn verification_response(verified: Result<bool, JoinError>) -> (StatusCode, Json<AdminLoginResponse>) {
    match verified {
        Ok(true) => {
            tracing::info!("Admin login succeeded");
            (StatusCode::OK, Json(AdminLoginResponse::ok()))
        }
        Ok(false) => {
            tracing::warn!("Admin login failed");
            (
                StatusCode::UNAUTHORIZED,
                Json(AdminLoginResponse::rejected("Incorrect password")),
            )
        }
        Err(e) => {
            tracing::error!("Admin password check did not complete: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AdminLoginResponse::rejected("Password check failed")),
            )
        }
    }
}
