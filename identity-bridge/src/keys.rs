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

//! Service-account private key import.
//!
//! The key arrives through an environment variable, which mangles it in
//! predictable ways: real newlines replaced by the two characters `\n`,
//! surrounding quotes, CRLF line endings, or the whole PEM squashed onto one
//! line. Import ignores all of that and only looks at the Base64 body.

use std::fmt;
use std::sync::OnceLock;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use regex::Regex;
use rsa::pkcs1v15;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use sha2::Sha256;

/// Standard alphabet; some secret stores drop the trailing `=` padding.
const PEM_BODY: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The key could not be turned into an RSA signing key. Fatal: the
/// configuration is wrong, retrying will not help.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Private key import failed. Check FIREBASE_PRIVATE_KEY syntax. Details: {0}")]
pub struct KeyImportError(String);

/// An RSA private key ready for RSASSA-PKCS1-v1_5 / SHA-256 signing.
#[derive(Clone)]
pub struct SigningKey {
    inner: pkcs1v15::SigningKey<Sha256>,
}

impl SigningKey {
    pub(crate) fn pkcs1v15(&self) -> &pkcs1v15::SigningKey<Sha256> {
        &self.inner
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(RS256, <redacted>)")
    }
}

fn armor_pattern() -> &'static Regex {
    static ARMOR: OnceLock<Regex> = OnceLock::new();
    ARMOR.get_or_init(|| Regex::new(r"-----(BEGIN|END)[A-Z0-9 ]*-----").expect("valid regex"))
}

/// Reduce loosely-escaped PEM text to its bare Base64 body.
fn pem_body(pem: &str) -> String {
    let unescaped = pem.replace("\\r", "\r").replace("\\n", "\n");
    armor_pattern()
        .replace_all(&unescaped, "")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect()
}

/// Parse a PEM-encoded PKCS#8 RSA private key.
pub fn import_private_key(pem: &str) -> Result<SigningKey, KeyImportError> {
    let body = pem_body(pem);
    if body.is_empty() {
        return Err(KeyImportError("no key material found".to_string()));
    }

    let der = PEM_BODY
        .decode(body.as_bytes())
        .map_err(|e| KeyImportError(format!("invalid base64: {e}")))?;

    let key = RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| KeyImportError(format!("not a PKCS#8 RSA private key: {e}")))?;

    Ok(SigningKey {
        inner: pkcs1v15::SigningKey::<Sha256>::new(key),
    })
}

/// PEM key material imported on first use and cached for the life of the
/// process. A failed import is cached as well: the input cannot change.
pub struct LazySigningKey {
    pem: String,
    key: OnceLock<Result<SigningKey, KeyImportError>>,
}

impl LazySigningKey {
    pub fn new(pem: impl Into<String>) -> Self {
        Self {
            pem: pem.into(),
            key: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<&SigningKey, KeyImportError> {
        self.key
            .get_or_init(|| import_private_key(&self.pem))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl fmt::Debug for LazySigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.key.get() {
            None => "pending",
            Some(Ok(_)) => "imported",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("LazySigningKey").field("state", &state).finish()
    }
}
