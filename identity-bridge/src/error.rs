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

//! Application error type that implements Axum's `IntoResponse`.
//!
//! Every failure of `GET /auth` ends here and is rendered as an
//! [`ErrorResponse`] body with the matching status. Nothing propagates past
//! this boundary as a transport-level failure.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use identity_bridge_types::ErrorResponse;

use crate::keys::KeyImportError;
use crate::oauth::ProviderError;
use crate::token::SigningError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    KeyImport(#[from] KeyImportError),
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// No service account is configured, so nothing can be signed.
    #[error("Server config error (Missing Firebase Creds)")]
    MissingCredentials,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Provider(ProviderError::TokenExchange { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Provider(ProviderError::TokenExchange { details }) => {
                ErrorResponse::token_exchange_failed(details)
            }
            Self::MissingCredentials => {
                tracing::error!("Allowed user could not be issued a token: service account not configured");
                ErrorResponse::missing_credentials()
            }
            other => {
                tracing::error!("{other}");
                ErrorResponse::server_error(&other.to_string())
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Render a handler panic the same way as any other internal fault.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::server_error(&message)),
    )
        .into_response()
}
