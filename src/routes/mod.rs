// ABOUTME: Axum router wiring for the external HTTP surface (spec.md §6)
// ABOUTME: Thin handlers that deserialize, call core services, and serialize — no logic here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! `HTTP` surface, built the way `routes/admin/tokens.rs` and
//! `routes/llm_settings.rs` build theirs: `axum::extract::{State, Query,
//! Json, Path}` handlers returning `Result<impl IntoResponse, AppError>`.

pub mod admin;
pub mod agent_auth;
pub mod authorize;
pub mod discovery;
pub mod introspect;
pub mod revoke;
pub mod token;

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Rejects requests once an IP exceeds the configured rate, otherwise
/// passes through. Applied only to the authentication-sensitive routes
/// (spec.md §9's supplemental hardening, not a spec.md core requirement).
async fn rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: Next,
) -> impl IntoResponse {
    if state.rate_limiter.check(addr.ip()) {
        next.run(request).await
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "invalid_request",
                "error_description": "rate limit exceeded, try again later",
            })),
        )
            .into_response()
    }
}

/// Build the full application router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let rate_limited = Router::new()
        .route("/authorize", get(authorize::begin_authorization))
        .route(
            "/api/agent/authenticate",
            post(agent_auth::authenticate_agent),
        )
        .route("/token", post(token::issue_token))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    let unrestricted = Router::new()
        .route("/api/check-status", get(agent_auth::check_status))
        .route("/introspect", post(introspect::introspect))
        .route("/revoke", post(revoke::revoke))
        .route(
            "/.well-known/oauth-authorization-server",
            get(discovery::metadata),
        )
        .route("/.well-known/jwks.json", get(discovery::jwks))
        .route(
            "/api/admin/agents",
            post(admin::create_agent).get(admin::list_agents),
        )
        .route(
            "/api/admin/agents/:id",
            get(admin::get_agent).delete(admin::delete_agent),
        )
        .route(
            "/api/admin/clients",
            post(admin::create_client).get(admin::list_clients),
        )
        .route(
            "/api/admin/clients/:id",
            get(admin::get_client)
                .put(admin::update_client)
                .delete(admin::delete_client),
        );

    rate_limited
        .merge(unrestricted)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
