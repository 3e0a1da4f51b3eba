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

//! The identity provider's user record.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A user record as returned by the provider's "current user" endpoint.
///
/// Only `id` is interpreted. Everything else (username, avatar, locale, ...)
/// is carried through untouched so the caller can render it.
///
/// ```json
/// { "id": "80351110224678912", "username": "nelly", "avatar": "8342729096ea3675442027381ff50dfe" }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExternalProfile {
    /// Stable unique identifier. A numeric id on the wire is stringified.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    /// Opaque passthrough attributes.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ExternalProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// Attach a passthrough attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::invalid_type(
            de::Unexpected::Other(&other.to_string()),
            &"a string or numeric id",
        )),
    }
}
