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

//! Custom token minting.
//!
//! The bridge signs tokens with the service account's RSA key; the identity
//! platform validates the signature, the audience and the expiry, then signs
//! the user in as `uid`.

use identity_bridge_types::{CustomTokenClaims, CustomTokenHeader, DeveloperClaims};
use rsa::pkcs1v15::Signature;
use rsa::signature::{SignatureEncoding, Signer};
use serde::Serialize;

use crate::b64;
use crate::keys::SigningKey;

/// The signing step failed. Carries the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Token signing failed: {0}")]
    Crypto(#[from] rsa::signature::Error),
    #[error("Token encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A compact `header.payload.signature` JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomToken(String);

impl CustomToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, SigningError> {
    Ok(b64::encode(serde_json::to_vec(value)?))
}

/// Mint a custom token for an allow-listed account. `now` is Unix seconds.
pub fn mint(
    subject_id: &str,
    issuer_email: &str,
    key: &SigningKey,
    now: i64,
) -> Result<CustomToken, SigningError> {
    mint_with_claims(subject_id, issuer_email, key, now, DeveloperClaims::admin())
}

/// Mint a custom token carrying an arbitrary developer claims bag.
pub fn mint_with_claims(
    subject_id: &str,
    issuer_email: &str,
    key: &SigningKey,
    now: i64,
    claims: DeveloperClaims,
) -> Result<CustomToken, SigningError> {
    let header = CustomTokenHeader::rs256();
    let payload = CustomTokenClaims::new(subject_id, issuer_email, now, claims);

    let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&payload)?);
    let signature: Signature = key.pkcs1v15().try_sign(signing_input.as_bytes())?;

    Ok(CustomToken(format!(
        "{signing_input}.{}",
        b64::encode(signature.to_bytes())
    )))
}
