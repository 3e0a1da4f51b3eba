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

//! Discord OAuth2 client: authorize URL construction, authorization code
//! exchange, and the "current user" profile fetch.
//!
//! There is no retry anywhere in here. A failure is reported to the caller,
//! who restarts the OAuth flow from scratch if they want to.

use identity_bridge_types::ExternalProfile;
use oauth2::{AccessToken, AuthorizationCode};
use serde_json::Value;
use url::Url;

use crate::config::OAuthConfig;

/// The only scope the bridge needs: read the account id.
pub const SCOPE: &str = "identify";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The token endpoint answered without an access token: the code was
    /// expired, reused or invalid, or the client is misconfigured.
    #[error("Failed to get discord token")]
    TokenExchange { details: Value },
    /// Transport failure, timeout, non-2xx profile response, or a body the
    /// bridge cannot read.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Build the provider's authorize URL for the `code` flow.
pub fn build_auth_url(authorize_url: &Url, client_id: &str, redirect_uri: &str) -> Url {
    let mut url = authorize_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", SCOPE);
    url
}

/// HTTP client bound to one OAuth application.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl DiscordClient {
    /// The configured timeout applies to every outbound request.
    pub fn new(config: OAuthConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn auth_url(&self) -> Url {
        build_auth_url(
            &self.config.authorize_url,
            &self.config.client_id,
            &self.config.redirect_uri,
        )
    }

    /// Exchange a single-use authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &AuthorizationCode,
    ) -> Result<AccessToken, ProviderError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.secret().as_str()),
            ("grant_type", "authorization_code"),
            ("code", code.secret().as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("token request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::Unavailable(format!("failed to read token response: {e}"))
        })?;

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Unavailable(format!(
                "token endpoint returned HTTP {status} with a non-JSON body: {e}"
            ))
        })?;

        match payload.get("access_token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token.to_string())),
            _ => {
                tracing::warn!("Token exchange returned no access_token (HTTP {status})");
                Err(ProviderError::TokenExchange { details: payload })
            }
        }
    }

    /// Fetch the profile of the account the access token belongs to.
    pub async fn fetch_profile(
        &self,
        access_token: &AccessToken,
    ) -> Result<ExternalProfile, ProviderError> {
        let response = self
            .http
            .get(self.config.user_url.clone())
            .bearer_auth(access_token.secret())
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("profile request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unavailable(format!(
                "profile endpoint returned HTTP {status}: {body}"
            )));
        }

        response
            .json::<ExternalProfile>()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("failed to parse profile: {e}")))
    }
}
