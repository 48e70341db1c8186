// ABOUTME: Cryptographically secure random byte and identifier generation
// ABOUTME: Backs opaque authorization codes, refresh tokens, and default credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Secure randomness, following `client_registration.rs`'s use of
//! `ring::rand::SystemRandom` for generated client secrets.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};

/// Fill and return `len` cryptographically secure random bytes.
///
/// # Panics
/// Panics if the system RNG fails to fill the buffer, which only happens if
/// the underlying OS entropy source is unavailable.
#[must_use]
#[allow(clippy::panic)]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let rng = SystemRandom::new();
    let mut bytes = vec![0_u8; len];
    rng.fill(&mut bytes)
        .unwrap_or_else(|_| panic!("system RNG unavailable"));
    bytes
}

/// Generate a URL-safe, unpadded base64 opaque identifier prefixed with
/// `prefix` (e.g. `code_`, `rt_`, `agent_`, `client_`), per spec.md §3.
#[must_use]
pub fn random_id(prefix: &str) -> String {
    let raw = random_bytes(32);
    format!("{prefix}{}", URL_SAFE_NO_PAD.encode(raw))
}
