// ABOUTME: POST /introspect handler (RFC 7662)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::errors::AppResult;
use crate::introspection::IntrospectRequest;
use crate::AppState;

/// `POST /introspect`.
///
/// # Errors
/// See [`crate::introspection::IntrospectionService::introspect`].
pub async fn introspect(
    State(state): State<AppState>,
    Json(req): Json<IntrospectRequest>,
) -> AppResult<impl IntoResponse> {
    let response = state.introspection.introspect(&req)?;
    Ok(Json(response))
}
