// ABOUTME: HS256 JWT signing and verification for access tokens
// ABOUTME: Mirrors the teacher's auth.rs AuthManager generate/validate pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Access-token `JWT`s, following `auth.rs`'s HS256 usage of the
//! `jsonwebtoken` crate rather than `oauth2_server/endpoints.rs`'s later
//! RS256/JWKS migration — spec.md §4.1 and §6 require HS256 and an empty
//! JWKS document, so this crate stays on the simpler, symmetric path.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Claims embedded in every access-token `JWT` (spec.md §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated agent's id.
    pub sub: String,
    /// The `OAuth` client the token was issued to.
    pub client_id: String,
    /// The agent's declared model identifier.
    pub model: String,
    /// Space-delimited granted scope.
    pub scope: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

/// Sign `claims` into a compact HS256 `JWT` using `secret`.
///
/// # Errors
/// Returns a `server_error` [`AppError`] if encoding fails.
pub fn sign(claims: &Claims, secret: &[u8]) -> Result<String, AppError> {
    encode(
        &Header::new(jsonwebtoken::Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::server_error(format!("failed to sign access token: {e}")))
}

/// Verify and decode an access-token `JWT`.
///
/// Validates signature, `exp`, and `iss` (set to `expected_issuer`);
/// `nbf`/`aud` are not used by this server.
///
/// # Errors
/// Returns an `invalid_grant` [`AppError`] if the token is malformed, expired,
/// or signed with a different key.
pub fn verify(token: &str, secret: &[u8], expected_issuer: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_issuer(&[expected_issuer]);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::invalid_grant(format!("access token invalid: {e}")))
}
