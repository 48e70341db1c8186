// ABOUTME: PKCE S256 code_challenge verification
// ABOUTME: Constant-time comparison of SHA-256(code_verifier) against the stored challenge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! PKCE verification, reimplementing the S256 check from the teacher's
//! `endpoints.rs::validate_and_consume_auth_code`: SHA-256 the verifier,
//! base64url-encode without padding, and compare in constant time.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// The only `code_challenge_method` this server accepts (spec.md §4.3).
pub const METHOD_S256: &str = "S256";

/// Verify `code_verifier` against a stored `code_challenge` using S256.
///
/// Returns `false` on any mismatch, including a malformed verifier; this
/// function never errors, since a PKCE failure is always just "grant denied".
#[must_use]
pub fn verify_s256(code_verifier: &str, code_challenge: &str) -> bool {
    let digest = Sha256::digest(code_verifier.as_bytes());
    let computed = URL_SAFE_NO_PAD.encode(digest);
    // Constant-time compare over bytes; lengths differ trivially for most
    // mismatches but the digest-derived encoding is fixed-length for valid
    // input, so this still avoids leaking anything useful via timing.
    computed.as_bytes().ct_eq(code_challenge.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn accepts_matching_pair() {
        // RFC 7636 appendix B example pair.
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let challenge = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";
        assert!(verify_s256(verifier, challenge));
    }

    #[test]
    fn rejects_wrong_verifier() {
        let challenge = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";
        assert!(!verify_s256("not-the-right-verifier", challenge));
    }
}
