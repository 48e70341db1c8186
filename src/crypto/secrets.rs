// ABOUTME: Argon2id hashing and verification for agent secrets and client secrets
// ABOUTME: Satisfies the spec's work-factor >= bcrypt(10)-equivalent requirement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Secret hashing, following the teacher's `client_registration.rs`
//! `hash_client_secret`/`verify_client_secret` functions, generalized to any
//! bearer secret (agent secrets as well as client secrets).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::AppError;

/// Hash a plaintext secret with Argon2id and a fresh random salt.
///
/// # Errors
/// Returns a `server_error` [`AppError`] if hashing fails (only possible on
/// pathological input, such as an absurdly long secret).
pub fn hash_secret(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::server_error(format!("failed to hash secret: {e}")))
}

/// Verify a plaintext secret against a previously generated Argon2id hash.
///
/// Returns `Ok(false)` (not an error) both when the secret simply does not
/// match and when `hash` is not a well-formed Argon2 hash string (spec.md
/// §4.1: a parse failure is treated as a verification failure, not a server
/// error).
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AppError> {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return Ok(false);
    };
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn round_trips_correct_secret() {
        let hash = hash_secret("correct-horse-battery-staple").expect("hash");
        assert!(verify_secret("correct-horse-battery-staple", &hash).expect("verify"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let hash = hash_secret("correct-horse-battery-staple").expect("hash");
        assert!(!verify_secret("wrong-secret", &hash).expect("verify"));
    }

    #[test]
    fn distinct_hashes_for_same_secret() {
        let a = hash_secret("same-secret").expect("hash");
        let b = hash_secret("same-secret").expect("hash");
        assert_ne!(a, b, "salts must differ between calls");
    }
}
