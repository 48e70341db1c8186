// ABOUTME: POST /revoke handler (RFC 7009)
// ABOUTME: Always presents a success facade once client credentials validate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::errors::AppResult;
use crate::introspection::RevokeRequest;
use crate::AppState;

/// `POST /revoke`.
///
/// # Errors
/// Returns `invalid_client` if the requesting client fails to authenticate;
/// otherwise always succeeds (spec.md §4.6, RFC 7009).
pub async fn revoke(
    State(state): State<AppState>,
    Json(req): Json<RevokeRequest>,
) -> AppResult<impl IntoResponse> {
    state.introspection.revoke(&req)?;
    Ok((StatusCode::OK, Json(json!({}))))
}
