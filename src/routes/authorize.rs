// ABOUTME: GET /authorize handler
// ABOUTME: Renders the HTML landing page embedding request_id, or an HTML error page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::coordinator::BeginAuthorizationParams;
use crate::AppState;

/// `GET /authorize`. Both success and error responses are `200 text/html`
/// bodies (spec.md §4.4: authorization cannot safely redirect to an
/// unverified `redirect_uri`, so failures render a human-readable page
/// rather than erroring out to the client).
pub async fn begin_authorization(
    State(state): State<AppState>,
    Query(params): Query<BeginAuthorizationParams>,
) -> impl IntoResponse {
    match state.coordinator.begin_authorization(&params) {
        Ok(request) => (
            StatusCode::OK,
            Html(crate::coordinator::render_authorize_page(&request.request_id)),
        ),
        Err(err) => (
            StatusCode::OK,
            Html(crate::coordinator::render_authorize_error_page(&err)),
        ),
    }
}
