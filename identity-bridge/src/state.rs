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

//! Shared application state passed to every Axum handler via `State`.
//!
//! Everything in here is immutable after startup, so concurrent requests
//! read it without locking.

use std::sync::Arc;

use crate::allowlist::AllowList;
use crate::auth::AdminPassword;
use crate::config::{Config, ServiceAccountConfig};
use crate::keys::LazySigningKey;
use crate::oauth::DiscordClient;

/// Firebase service account with its key imported on first use.
#[derive(Debug)]
pub struct ServiceAccount {
    pub client_email: String,
    pub key: LazySigningKey,
}

impl From<&ServiceAccountConfig> for ServiceAccount {
    fn from(config: &ServiceAccountConfig) -> Self {
        Self {
            client_email: config.client_email.clone(),
            key: LazySigningKey::new(config.private_key_pem.clone()),
        }
    }
}

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Discord OAuth client (holds the pooled HTTP client).
    pub discord: DiscordClient,
    /// Accounts allowed to receive a custom token.
    pub allowed_ids: Arc<AllowList>,
    /// `None` means every allowed login fails with "Missing Firebase Creds".
    pub service_account: Option<Arc<ServiceAccount>>,
    /// `None` disables `POST /api/auth`.
    pub admin_password: Option<AdminPassword>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let discord = DiscordClient::new(config.oauth.clone())?;
        let admin_password = config
            .admin_password
            .as_deref()
            .map(AdminPassword::hash)
            .transpose()
            .map_err(|e| anyhow::anyhow!("failed to hash ADMIN_PASSWORD: {e}"))?;

        Ok(Self {
            discord,
            allowed_ids: Arc::new(config.allowed_ids.clone()),
            service_account: config
                .service_account
                .as_ref()
                .map(|sa| Arc::new(ServiceAccount::from(sa))),
            admin_password,
        })
    }
}
