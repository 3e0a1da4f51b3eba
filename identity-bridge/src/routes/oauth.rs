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

//! `GET /auth`: the Discord login round trip.
//!
//! Without a `code` the handler only hands out the Discord authorize URL.
//! With one it runs, strictly in order: code exchange, profile fetch,
//! allow-list check, custom token mint. Any failing step ends the request;
//! a token is minted only as the very last step, so a request that is
//! dropped part-way leaves nothing behind.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use identity_bridge_types::requests::AuthQuery;
use identity_bridge_types::responses::{AuthUrlResponse, LoginDeniedResponse, LoginSuccessResponse};
use identity_bridge_types::ExternalProfile;
use oauth2::AuthorizationCode;

use crate::allowlist::is_allowed;
use crate::error::AppError;
use crate::state::AppState;
use crate::token::{self, CustomToken};

/// Which half of the OAuth round trip a request is.
#[derive(Debug)]
pub enum AuthMode {
    /// No code yet: send the browser to Discord.
    IssueUrl,
    /// Discord redirected back with a code.
    CompleteLogin(AuthorizationCode),
}

/// Read the query string the way a browser's `URLSearchParams::get` does:
/// the first `code` wins, later duplicates and unknown keys are ignored.
pub fn parse_auth_query(raw: Option<&str>) -> AuthQuery {
    let code = raw.and_then(|raw| {
        url::form_urlencoded::parse(raw.as_bytes())
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
    });
    AuthQuery { code }
}

impl From<AuthQuery> for AuthMode {
    fn from(query: AuthQuery) -> Self {
        match query.code {
            Some(code) if !code.is_empty() => Self::CompleteLogin(AuthorizationCode::new(code)),
            _ => Self::IssueUrl,
        }
    }
}

/// Terminal outcome of a login that got as far as the allow-list check.
#[derive(Debug)]
pub enum LoginOutcome {
    Minted {
        token: CustomToken,
        profile: ExternalProfile,
    },
    Denied {
        profile: ExternalProfile,
    },
}

impl IntoResponse for LoginOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Minted { token, profile } => {
                Json(LoginSuccessResponse::new(token.into_string(), profile)).into_response()
            }
            Self::Denied { profile } => {
                (StatusCode::FORBIDDEN, Json(LoginDeniedResponse::new(profile))).into_response()
            }
        }
    }
}

/// GET /auth[?code=...]
pub async fn auth(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    match AuthMode::from(parse_auth_query(raw.as_deref())) {
        AuthMode::IssueUrl => {
            let url = state.discord.auth_url().to_string();
            Ok(Json(AuthUrlResponse { url }).into_response())
        }
        AuthMode::CompleteLogin(code) => {
            let outcome = complete_login(&state, &code, Utc::now().timestamp()).await?;
            Ok(outcome.into_response())
        }
    }
}

/// Run the code-present branch to a terminal outcome. `now` is Unix seconds.
pub async fn complete_login(
    state: &AppState,
    code: &AuthorizationCode,
    now: i64,
) -> Result<LoginOutcome, AppError> {
    let access_token = state.discord.exchange_code(code).await?;
    let profile = state.discord.fetch_profile(&access_token).await?;

    if !is_allowed(&profile, &state.allowed_ids) {
        tracing::warn!("Rejected login for Discord account {}", profile.id);
        return Ok(LoginOutcome::Denied { profile });
    }

    let account = state
        .service_account
        .as_deref()
        .ok_or(AppError::MissingCredentials)?;
    let key = account.key.get()?;
    let token = token::mint(&profile.id, &account.client_email, key, now)?;

    tracing::info!("Issued custom token for Discord account {}", profile.id);
    Ok(LoginOutcome::Minted { token, profile })
}
