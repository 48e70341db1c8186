// ABOUTME: Library root for the agent OAuth authorization server
// ABOUTME: Wires crypto, store, validation, coordinator, token_service, introspection, and admin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! An `OAuth` 2.1 authorization server specialized for non-human "agent"
//! principals: credential-pair `(agent_id, agent_secret)` back-channel
//! authentication layered onto a standard authorization-code + PKCE flow.
//!
//! See each module for its piece of the design; [`AppState`] is the
//! dependency-injection root the HTTP layer (`routes`) is built on.

pub mod admin;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod crypto;
pub mod errors;
pub mod introspection;
pub mod logging;
pub mod rate_limit;
pub mod routes;
pub mod store;
pub mod token_service;
pub mod validation;

use std::sync::Arc;

use crate::admin::AdminService;
use crate::config::ServerConfig;
use crate::coordinator::Coordinator;
use crate::introspection::IntrospectionService;
use crate::rate_limit::RateLimiter;
use crate::store::Store;
use crate::token_service::TokenService;

/// Shared application state, constructed once at startup and cloned (cheaply,
/// via `Arc`) into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub coordinator: Arc<Coordinator>,
    pub token_service: Arc<TokenService>,
    pub introspection: Arc<IntrospectionService>,
    pub admin: Arc<AdminService>,
    pub config: Arc<ServerConfig>,
    /// Guards `/authorize`, `/api/agent/authenticate`, and `/token`
    /// (supplemental defense-in-depth; see `rate_limit`).
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Construct the full dependency graph from a loaded [`ServerConfig`].
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(Store::new());
        let coordinator = Arc::new(Coordinator::new(
            Arc::clone(&store),
            config.auth_request_ttl_secs,
            config.default_scope.clone(),
        ));
        let token_service = Arc::new(TokenService::new(
            Arc::clone(&store),
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
            config.jwt_secret.clone(),
            config.issuer.clone(),
        ));
        let introspection = Arc::new(IntrospectionService::new(
            Arc::clone(&store),
            config.jwt_secret.clone(),
            config.issuer.clone(),
        ));
        let admin = Arc::new(AdminService::new(Arc::clone(&store)));
        let rate_limiter = Arc::new(RateLimiter::new(30, std::time::Duration::from_secs(60)));

        Self {
            store,
            coordinator,
            token_service,
            introspection,
            admin,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}
