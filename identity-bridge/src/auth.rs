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

//! Admin password check for the dashboard's admin screen.
//!
//! The plaintext from `ADMIN_PASSWORD` is hashed with Argon2 at startup and
//! dropped; only the PHC string stays in memory.

use std::fmt;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

#[derive(Clone)]
pub struct AdminPassword {
    phc: String,
}

impl AdminPassword {
    pub fn hash(plaintext: &str) -> Result<Self, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        let phc = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)?
            .to_string();
        Ok(Self { phc })
    }

    pub fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.phc) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!("Stored admin password hash is unreadable: {e}");
                false
            }
        }
    }
}

impl fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminPassword(<argon2>)")
    }
}
