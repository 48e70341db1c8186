// ABOUTME: RFC 8414 discovery document and the (empty) JWKS endpoint
// ABOUTME: Translated from oauth2_server/routes.rs's warp filters into Axum handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// `GET /.well-known/oauth-authorization-server` (spec.md §6).
pub async fn metadata(State(state): State<AppState>) -> impl IntoResponse {
    let issuer = &state.config.issuer;
    Json(json!({
        "issuer": issuer,
        "authorization_endpoint": format!("{issuer}/authorize"),
        "token_endpoint": format!("{issuer}/token"),
        "introspection_endpoint": format!("{issuer}/introspect"),
        "revocation_endpoint": format!("{issuer}/revoke"),
        "jwks_uri": format!("{issuer}/.well-known/jwks.json"),
        "response_types_supported": ["code"],
        "grant_types_supported": ["authorization_code", "refresh_token"],
        "code_challenge_methods_supported": ["S256"],
        "token_endpoint_auth_methods_supported": ["client_secret_post", "client_secret_basic"],
        "scopes_supported": ["openid", "profile", "email"],
        "token_endpoint_auth_signing_alg_values_supported": ["HS256"],
    }))
}

/// `GET /.well-known/jwks.json`. Always empty: HS256 is symmetric, so there
/// is no public key material to publish (spec.md §6, §9).
pub async fn jwks() -> impl IntoResponse {
    Json(json!({ "keys": [] }))
}
