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

//! End-to-end tests for `GET /auth` against a mock Discord API.


use axum::http::StatusCode;
use identity_bridge_types::CustomTokenClaims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};
use std::time::Duration;
use test_helpers::*;
use tower::ServiceExt;

// ── Login URL ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_code_returns_authorize_url() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("1"))).await;
    let app = build_app(base_vars(&mock.base_url));

    let resp = app.oneshot(get_request("/auth")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = response_json(resp).await;
    let url = body["url"].as_str().expect("url field");
    assert!(url.starts_with("https://discord.com/api/oauth2/authorize?"));
    assert!(url.contains(&format!("client_id={TEST_CLIENT_ID}")));
    assert!(url.contains("scope=identify"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("redirect_uri=https%3A%2F%2Fdashboard.example.com%2Fadmin"));

    assert_eq!(mock.recorded.token_calls(), 0);
    assert_eq!(mock.recorded.profile_calls(), 0);
}

#[tokio::test]
async fn test_empty_code_is_treated_as_absent() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("1"))).await;
    let app = build_app(base_vars(&mock.base_url));

    let resp = app.oneshot(get_request("/auth?code=")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = response_json(resp).await;
    assert!(body["url"].is_string());
    assert_eq!(mock.recorded.token_calls(), 0);
}

#[tokio::test]
async fn test_repeated_code_uses_first_value() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let app = build_app(base_vars(&mock.base_url));

    let resp = app.oneshot(get_request("/auth?code=a&code=b")).await.unwrap();
    assert_eq!(
        resp.headers()[axum::http::header::CONTENT_TYPE],
        "application/json"
    );
    // Not allow-listed in the base config: the login runs through to the gate.
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = response_json(resp).await;
    assert_eq!(body["error"], "Unauthorized user");

    let forms = mock.recorded.token_forms.lock().unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["code"], "a");
}

#[tokio::test]
async fn test_legacy_path_serves_same_endpoint() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("1"))).await;
    let app = build_app(base_vars(&mock.base_url));

    let resp = app.oneshot(get_request("/api/discord")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = response_json(resp).await;
    assert!(body["url"].as_str().unwrap().contains("scope=identify"));
}

// ── Token exchange failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_rejected_code_returns_400_with_provider_details() {
    let provider_error = json!({
        "error": "invalid_grant",
        "error_description": "Invalid \"code\" in request."
    });
    let mock = spawn_mock_discord(
        TokenBehavior::Respond(StatusCode::BAD_REQUEST, provider_error.clone()),
        ProfileBehavior::User(discord_user("12345")),
    )
    .await;
    let app = build_app(base_vars(&mock.base_url));

    let resp = app.oneshot(get_request("/auth?code=expired")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = response_json(resp).await;
    assert_eq!(body["error"], "Failed to get discord token");
    assert_eq!(body["details"], provider_error);
    assert_eq!(mock.recorded.profile_calls(), 0);
}

#[tokio::test]
async fn test_success_status_without_access_token_returns_400() {
    let mock = spawn_mock_discord(
        TokenBehavior::Respond(StatusCode::OK, json!({ "token_type": "Bearer" })),
        ProfileBehavior::User(discord_user("12345")),
    )
    .await;
    let app = build_app(base_vars(&mock.base_url));

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = response_json(resp).await;
    assert_eq!(body["error"], "Failed to get discord token");
    assert_eq!(body["details"]["token_type"], "Bearer");
}

#[tokio::test]
async fn test_non_json_token_response_is_server_error() {
    let mock = spawn_mock_discord(TokenBehavior::NotJson, ProfileBehavior::User(discord_user("1"))).await;
    let app = build_app(base_vars(&mock.base_url));

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response_json(resp).await;
    assert_eq!(body["error"], "Server Error");
    assert!(body["message"].as_str().unwrap().contains("502"));
}

#[tokio::test]
async fn test_unreachable_provider_is_server_error() {
    // Bind then drop a listener so the port is known to be closed.
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let app = build_app(base_vars(&format!("http://{closed}")));

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response_json(resp).await;
    assert_eq!(body["error"], "Server Error");
    assert!(body["message"].as_str().unwrap().contains("token request failed"));
}

// ── Profile fetch failures ───────────────────────────────────────────────

#[tokio::test]
async fn test_profile_endpoint_error_is_server_error() {
    let mock = spawn_mock_discord(
        TokenBehavior::Grant,
        ProfileBehavior::Status(StatusCode::INTERNAL_SERVER_ERROR),
    )
    .await;
    let app = build_app(with_service_account(base_vars(&mock.base_url), RSA_PRIVATE_PEM));

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response_json(resp).await;
    assert_eq!(body["error"], "Server Error");
    assert!(body.get("firebase_token").is_none());
}

#[tokio::test]
async fn test_slow_profile_endpoint_times_out() {
    let mock = spawn_mock_discord(
        TokenBehavior::Grant,
        ProfileBehavior::Slow(Duration::from_secs(5), discord_user("12345")),
    )
    .await;
    let vars = with_var(
        with_service_account(base_vars(&mock.base_url), RSA_PRIVATE_PEM),
        "ALLOWED_DISCORD_IDS",
        "12345",
    );
    let app = build_app(vars);

    let started = std::time::Instant::now();
    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response_json(resp).await;
    assert_eq!(body["error"], "Server Error");
}

// ── Allow-list ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_disallowed_user_returns_403_with_profile() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let vars = with_var(
        with_service_account(base_vars(&mock.base_url), RSA_PRIVATE_PEM),
        "ALLOWED_DISCORD_IDS",
        "99999",
    );
    let app = build_app(vars);

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = response_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unauthorized user");
    assert_eq!(body["user"]["id"], "12345");
    assert_eq!(body["user"]["username"], "tester");
    assert!(body.get("firebase_token").is_none());
}

#[tokio::test]
async fn test_case_variant_id_is_denied() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("abc123"))).await;
    let vars = with_var(
        with_service_account(base_vars(&mock.base_url), RSA_PRIVATE_PEM),
        "ALLOWED_DISCORD_IDS",
        "ABC123,abc1234",
    );
    let app = build_app(vars);

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_disallowed_user_is_denied_even_without_credentials() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let app = build_app(with_var(base_vars(&mock.base_url), "ALLOWED_DISCORD_IDS", "99999"));

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ── Minting ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_allowed_user_receives_verifiable_custom_token() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let vars = with_var(
        with_service_account(base_vars(&mock.base_url), RSA_PRIVATE_PEM),
        "ALLOWED_DISCORD_IDS",
        "12345",
    );
    let app = build_app(vars);

    let resp = app.oneshot(get_request("/auth?code=good-code")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = response_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"], discord_user("12345"));

    let token = body["firebase_token"].as_str().expect("firebase_token");
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);
    assert!(segments.iter().all(|s| !s.is_empty()));

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[CustomTokenClaims::AUDIENCE]);
    validation.set_issuer(&[TEST_SA_EMAIL]);
    let data = decode::<CustomTokenClaims>(
        token,
        &DecodingKey::from_rsa_pem(RSA_PUBLIC_PEM.as_bytes()).unwrap(),
        &validation,
    )
    .expect("token should verify");

    assert_eq!(data.claims.uid, "12345");
    assert_eq!(data.claims.sub, TEST_SA_EMAIL);
    assert_eq!(data.claims.exp - data.claims.iat, 3600);
    assert_eq!(data.claims.claims.is_admin, Some(true));
}

#[tokio::test]
async fn test_exchange_sends_grant_parameters_and_bearer_token() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let vars = with_var(
        with_service_account(base_vars(&mock.base_url), RSA_PRIVATE_PEM),
        "ALLOWED_DISCORD_IDS",
        "12345",
    );
    let app = build_app(vars);

    let resp = app.oneshot(get_request("/auth?code=the-code")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let forms = mock.recorded.token_forms.lock().unwrap().clone();
    assert_eq!(forms.len(), 1);
    let form = &forms[0];
    assert_eq!(form["grant_type"], "authorization_code");
    assert_eq!(form["code"], "the-code");
    assert_eq!(form["client_id"], TEST_CLIENT_ID);
    assert_eq!(form["client_secret"], TEST_CLIENT_SECRET);
    assert_eq!(form["redirect_uri"], TEST_REDIRECT_URI);

    let headers = mock.recorded.authorization_headers.lock().unwrap().clone();
    assert_eq!(headers, vec![format!("Bearer {TEST_ACCESS_TOKEN}")]);
}

#[tokio::test]
async fn test_escaped_newline_key_still_signs() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let escaped = RSA_PRIVATE_PEM.trim_end().replace('\n', "\\n");
    let vars = with_var(
        with_service_account(base_vars(&mock.base_url), &escaped),
        "ALLOWED_DISCORD_IDS",
        "12345",
    );
    let app = build_app(vars);

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = response_json(resp).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_missing_credentials_returns_500_config_error() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let app = build_app(with_var(base_vars(&mock.base_url), "ALLOWED_DISCORD_IDS", "12345"));

    let resp = app.oneshot(get_request("/auth?code=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response_json(resp).await;
    assert_eq!(
        body,
        json!({ "error": "Server config error (Missing Firebase Creds)" })
    );
}

#[tokio::test]
async fn test_non_rsa_key_returns_server_error() {
    let mock = spawn_mock_discord(TokenBehavior::Grant, ProfileBehavior::User(discord_user("12345"))).await;
    let vars = with_var(
        with_service_account(base_vars(&mock.base_url), EC_PRIVATE_PEM),
        "ALLOWED_DISCORD_IDS",
        "12345",
    );
    let app = build_app(vars);

    // The failure is cached; both requests get the same answer.
    for _ in 0..2 {
        let resp = app.clone().oneshot(get_request("/auth?code=abc")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response_json(resp).await;
        assert_eq!(body["error"], "Server Error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Private key import failed"));
    }
}
