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

//! Shared wire types for the identity bridge.
//!
//! This crate defines the JSON contract between the bridge service and its
//! consumers (the dashboard frontend, integration tests). It is intentionally
//! framework-agnostic: no axum, no HTTP client, no crypto.

pub mod error;
pub mod profile;
pub mod requests;
pub mod responses;
pub mod token;

pub use error::ErrorResponse;
pub use profile::ExternalProfile;
pub use token::{CustomTokenClaims, CustomTokenHeader, DeveloperClaims};
