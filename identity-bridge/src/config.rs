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

//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use oauth2::ClientSecret;
use url::Url;

use crate::allowlist::AllowList;

pub const DEFAULT_AUTHORIZE_URL: &str = "https://discord.com/api/oauth2/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
pub const DEFAULT_USER_URL: &str = "https://discord.com/api/users/@me";

/// Configuration for the identity bridge.
#[derive(Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8788").
    pub listen_addr: String,
    /// Discord OAuth application.
    pub oauth: OAuthConfig,
    /// Discord account ids allowed to receive a custom token.
    pub allowed_ids: AllowList,
    /// Firebase service account. `None` if either variable is unset or empty.
    pub service_account: Option<ServiceAccountConfig>,
    /// Plaintext admin password. `None` disables `POST /api/auth`.
    pub admin_password: Option<String>,
}

/// Discord OAuth configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: ClientSecret,
    pub redirect_uri: String,
    pub authorize_url: Url,
    pub token_url: Url,
    pub user_url: Url,
    /// Applied to each outbound call.
    pub timeout: Duration,
}

/// Firebase service account used to sign custom tokens.
#[derive(Clone)]
pub struct ServiceAccountConfig {
    pub client_email: String,
    /// PEM text, possibly with literal `\n` escapes.
    pub private_key_pem: String,
}

impl fmt::Debug for ServiceAccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountConfig")
            .field("client_email", &self.client_email)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("oauth", &self.oauth)
            .field("allowed_ids", &self.allowed_ids.len())
            .field("service_account", &self.service_account)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `DISCORD_CLIENT_ID`, `DISCORD_CLIENT_SECRET`, `DISCORD_REDIRECT_URI`
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8788"`)
    /// - `ALLOWED_DISCORD_IDS` (comma-separated; default: nobody)
    /// - `FIREBASE_CLIENT_EMAIL`, `FIREBASE_PRIVATE_KEY`
    /// - `DISCORD_AUTHORIZE_URL`, `DISCORD_TOKEN_URL`, `DISCORD_USER_URL`
    /// - `PROVIDER_TIMEOUT_SECS` (default: `"5"`)
    /// - `ADMIN_PASSWORD`
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or(format!("{key} environment variable is required"));
        let url_or = |key: &str, default: &str| {
            let raw = get(key).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|e| format!("{key} must be an absolute URL: {e}"))
        };

        let redirect_uri = require("DISCORD_REDIRECT_URI")?;
        Url::parse(&redirect_uri)
            .map_err(|e| format!("DISCORD_REDIRECT_URI must be an absolute URL: {e}"))?;

        let timeout_secs = get("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u64>()
            .map_err(|_| "PROVIDER_TIMEOUT_SECS must be a valid integer")?;
        if timeout_secs == 0 {
            return Err("PROVIDER_TIMEOUT_SECS must be greater than zero".to_string());
        }

        let oauth = OAuthConfig {
            client_id: require("DISCORD_CLIENT_ID")?,
            client_secret: ClientSecret::new(require("DISCORD_CLIENT_SECRET")?),
            redirect_uri,
            authorize_url: url_or("DISCORD_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL)?,
            token_url: url_or("DISCORD_TOKEN_URL", DEFAULT_TOKEN_URL)?,
            user_url: url_or("DISCORD_USER_URL", DEFAULT_USER_URL)?,
            timeout: Duration::from_secs(timeout_secs),
        };

        let service_account = match (get("FIREBASE_CLIENT_EMAIL"), get("FIREBASE_PRIVATE_KEY")) {
            (Some(client_email), Some(private_key_pem)) => Some(ServiceAccountConfig {
                client_email,
                private_key_pem,
            }),
            _ => None,
        };

        Ok(Self {
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8788".to_string()),
            oauth,
            allowed_ids: AllowList::parse(&get("ALLOWED_DISCORD_IDS").unwrap_or_default()),
            service_account,
            admin_password: lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty()),
        })
    }
}
