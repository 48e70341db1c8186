// ABOUTME: /api/admin/agents and /api/admin/clients handlers
// ABOUTME: Unauthenticated in the core per spec.md §9's known-gap design note
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::admin::{CreateAgentRequest, CreateClientRequest, UpdateClientRequest};
use crate::errors::AppResult;
use crate::AppState;

/// `POST /api/admin/agents`.
///
/// # Errors
/// See [`crate::admin::AdminService::create_agent`].
pub async fn create_agent(
    State(state): State<AppState>,
    Json(req): Json<CreateAgentRequest>,
) -> AppResult<impl IntoResponse> {
    let response = state.admin.create_agent(&req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/admin/agents`.
pub async fn list_agents(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.admin.list_agents())
}

/// `GET /api/admin/agents/:id`.
///
/// # Errors
/// Returns `not_found` if the agent does not exist.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let agent = state.admin.get_agent(&id)?;
    Ok(Json(agent))
}

/// `DELETE /api/admin/agents/:id`.
///
/// # Errors
/// Returns `not_found` if the agent does not exist.
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.admin.delete_agent(&id)?;
    Ok(StatusCode::OK)
}

/// `POST /api/admin/clients`.
///
/// # Errors
/// See [`crate::admin::AdminService::create_client`].
pub async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> AppResult<impl IntoResponse> {
    let response = state.admin.create_client(&req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/admin/clients`.
pub async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.admin.list_clients())
}

/// `GET /api/admin/clients/:id`.
///
/// # Errors
/// Returns `not_found` if the client does not exist.
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let client = state.admin.get_client(&id)?;
    Ok(Json(client))
}

/// `PUT /api/admin/clients/:id`.
///
/// # Errors
/// See [`crate::admin::AdminService::update_client`].
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateClientRequest>,
) -> AppResult<impl IntoResponse> {
    let client = state.admin.update_client(&id, &req)?;
    Ok(Json(client))
}

/// `DELETE /api/admin/clients/:id`.
///
/// # Errors
/// Returns `not_found` if the client does not exist.
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.admin.delete_client(&id)?;
    Ok(StatusCode::OK)
}
