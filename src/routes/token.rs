// ABOUTME: POST /token handler
// ABOUTME: Dispatches to the authorization-code or refresh-token grant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::errors::AppResult;
use crate::token_service::TokenRequest;
use crate::AppState;

/// `POST /token`.
///
/// # Errors
/// See [`crate::token_service::TokenService::handle`].
pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> AppResult<impl IntoResponse> {
    let response = state.token_service.handle(&req)?;
    Ok(Json(response))
}
