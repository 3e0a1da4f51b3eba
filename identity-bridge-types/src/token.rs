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

//! Custom token (JWT) header and claims.
//!
//! A custom token is an RS256-signed JWT minted by the bridge with the
//! service account's private key. The identity platform exchanges it for a
//! session of its own; it checks the signature and `exp` itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JOSE header of a custom token. Serializes to `{"alg":"RS256","typ":"JWT"}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CustomTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl CustomTokenHeader {
    pub const ALGORITHM: &'static str = "RS256";

    pub fn rs256() -> Self {
        Self {
            alg: Self::ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// JWT payload for a custom token.
///
/// # Example payload
///
/// ```json
/// {
///   "iss": "bridge@project.iam.gserviceaccount.com",
///   "sub": "bridge@project.iam.gserviceaccount.com",
///   "aud": "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit",
///   "iat": 1707001200,
///   "exp": 1707004800,
///   "uid": "80351110224678912",
///   "claims": { "is_admin": true }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomTokenClaims {
    /// Service account email.
    pub iss: String,

    /// Service account email (same as `iss`).
    pub sub: String,

    /// Always [`CustomTokenClaims::AUDIENCE`].
    pub aud: String,

    /// Issued-at (Unix seconds).
    pub iat: i64,

    /// Expiry (Unix seconds), always `iat + TTL_SECS`.
    pub exp: i64,

    /// The verified external identity, as a string.
    pub uid: String,

    /// Developer claims copied into the platform's ID tokens.
    pub claims: DeveloperClaims,
}

impl CustomTokenClaims {
    /// Audience the identity platform requires for custom tokens.
    pub const AUDIENCE: &'static str =
        "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

    /// Validity window stamped into `exp`. The platform rejects anything longer.
    pub const TTL_SECS: i64 = 3600;

    pub fn new(uid: &str, issuer_email: &str, now: i64, claims: DeveloperClaims) -> Self {
        Self {
            iss: issuer_email.to_string(),
            sub: issuer_email.to_string(),
            aud: Self::AUDIENCE.to_string(),
            iat: now,
            exp: now + Self::TTL_SECS,
            uid: uid.to_string(),
            claims,
        }
    }
}

/// The `claims` bag of a custom token.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DeveloperClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,

    /// Any further custom claims.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DeveloperClaims {
    const IS_ADMIN: &'static str = "is_admin";

    /// Claims granted to every allow-listed account.
    pub fn admin() -> Self {
        Self {
            is_admin: Some(true),
            extra: BTreeMap::new(),
        }
    }

    /// Add a custom claim. `is_admin` goes to the typed field so the key is
    /// never emitted twice.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == Self::IS_ADMIN {
            match value {
                Value::Bool(flag) => self.is_admin = Some(flag),
                other => {
                    self.is_admin = None;
                    self.extra.insert(key, other);
                }
            }
        } else {
            self.extra.insert(key, value);
        }
        self
    }
}
