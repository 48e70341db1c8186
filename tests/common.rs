// ABOUTME: Shared test fixtures for the integration test suite
// ABOUTME: Builds a fully wired AppState + axum Router with one seeded client and agent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use agent_oauth_server::config::ServerConfig;
use agent_oauth_server::{routes, AppState};
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

pub const AGENT_ID: &str = "agent_test";
pub const AGENT_SECRET: &str = "correct-horse-battery-staple";
pub const CLIENT_ID: &str = "client_test";
pub const CLIENT_SECRET: &str = "client-secret-value";
pub const REDIRECT_URI: &str = "https://example.com/callback";
pub const CODE_VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
pub const CODE_CHALLENGE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";

/// Build a test `ServerConfig` with short-but-sane TTLs and a fixed JWT secret
/// so token signatures are reproducible across assertions in a single test.
fn test_config() -> ServerConfig {
    ServerConfig {
        listen_port: 0,
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 2_592_000,
        auth_request_ttl_secs: 600,
        jwt_secret: b"integration-test-jwt-secret".to_vec(),
        issuer: "https://agents.example.com".to_owned(),
        default_scope: "openid profile".to_owned(),
        log_level: "error".to_owned(),
    }
}

/// Build a fresh `AppState` with one pre-registered client and one
/// pre-registered agent, using the well-known RFC 7636 appendix-B PKCE pair.
pub fn seeded_state() -> AppState {
    let state = AppState::new(test_config());

    state.store.insert_client(agent_oauth_server::store::models::Client {
        client_id: CLIENT_ID.to_owned(),
        secret_hash: agent_oauth_server::crypto::secrets::hash_secret(CLIENT_SECRET).expect("hash"),
        name: "Test Client".to_owned(),
        allowed_redirect_uris: vec![REDIRECT_URI.to_owned()],
        allowed_grant_types: agent_oauth_server::store::models::Client::default_grant_types(),
        created_at: chrono::Utc::now(),
    });

    state.store.insert_agent(agent_oauth_server::store::models::Agent {
        agent_id: AGENT_ID.to_owned(),
        secret_hash: agent_oauth_server::crypto::secrets::hash_secret(AGENT_SECRET).expect("hash"),
        user_email: "agent-owner@example.com".to_owned(),
        user_name: "Agent Owner".to_owned(),
        created_at: chrono::Utc::now(),
    });

    state
}

pub fn seeded_router() -> Router {
    routes::build_router(seeded_state())
}

/// Send `req` through `router`, stamping a fake peer address into the
/// request's extensions the way `into_make_service_with_connect_info` would
/// at runtime (required by the rate-limiting middleware's `ConnectInfo`
/// extractor, which `Router::oneshot` does not supply on its own).
pub async fn send(router: Router, mut req: Request<Body>) -> (StatusCode, Value) {
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);
    req.extensions_mut().insert(ConnectInfo(addr));

    let response = router.oneshot(req).await.expect("router call");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn json_put(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

/// Fetch a route's raw text body (used for the `/authorize` HTML landing
/// page, which the JSON-oriented [`send`] helper cannot parse).
pub async fn fetch_text(router: Router, uri: &str) -> String {
    let mut req = get(uri);
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);
    req.extensions_mut().insert(ConnectInfo(addr));

    let response = router.oneshot(req).await.expect("router call");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf8 body")
}

/// Percent-encode the handful of characters that appear in a redirect URI
/// query parameter for these tests (`:` and `/`); good enough for the fixed
/// `https://example.com/...` URIs used throughout, not a general encoder.
pub fn urlencode_uri(s: &str) -> String {
    s.replace(':', "%3A").replace('/', "%2F")
}

/// Extract `request_id` from the `/authorize` landing page's
/// `data-request-id="..."` attribute, the way the controlling agent does.
pub fn extract_request_id(html: &str) -> String {
    let marker = "data-request-id=\"";
    let start = html.find(marker).expect("data-request-id present") + marker.len();
    let end = html[start..].find('"').expect("closing quote");
    html[start..start + end].to_owned()
}
