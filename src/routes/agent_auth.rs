// ABOUTME: POST /api/agent/authenticate and GET /api/check-status handlers
// ABOUTME: The back-channel agent login and the browser's status-polling endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::coordinator::AuthenticateAgentRequest;
use crate::errors::AppResult;
use crate::AppState;

/// `POST /api/agent/authenticate`.
///
/// # Errors
/// See [`crate::coordinator::Coordinator::authenticate_agent`].
pub async fn authenticate_agent(
    State(state): State<AppState>,
    Json(req): Json<AuthenticateAgentRequest>,
) -> AppResult<impl IntoResponse> {
    let response = state.coordinator.authenticate_agent(&req)?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct CheckStatusParams {
    pub request_id: String,
}

/// `GET /api/check-status`.
///
/// # Errors
/// See [`crate::coordinator::Coordinator::poll_status`].
pub async fn check_status(
    State(state): State<AppState>,
    Query(params): Query<CheckStatusParams>,
) -> AppResult<impl IntoResponse> {
    let status = state.coordinator.poll_status(&params.request_id)?;
    Ok(Json(status))
}
