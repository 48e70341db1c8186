// ABOUTME: System-wide constants for the agent OAuth server
// ABOUTME: Default TTLs, identifier prefixes, and environment-variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Hardcoded defaults and the environment variable names that override them,
//! following the pattern of the teacher's `constants::env_config` module.

/// Time-to-live defaults, in seconds unless noted.
pub mod ttl {
    /// Authorization request / authorization code lifetime (spec.md §3: 10 minutes).
    pub const AUTH_REQUEST_SECS: i64 = 600;
    /// Access token lifetime (spec.md §4.5: 1 hour).
    pub const ACCESS_TOKEN_SECS: i64 = 3600;
    /// Refresh token lifetime (spec.md §4.5: 30 days).
    pub const REFRESH_TOKEN_SECS: i64 = 30 * 24 * 3600;
    /// Sweeper period (spec.md §4.2: every 5 minutes).
    pub const SWEEP_INTERVAL_SECS: u64 = 300;
}

/// Opaque-identifier prefixes, per spec.md §3's data model.
pub mod prefix {
    /// Authorization code prefix.
    pub const AUTH_CODE: &str = "code_";
    /// Refresh token prefix.
    pub const REFRESH_TOKEN: &str = "rt_";
    /// Default agent id prefix (spec.md §4.7).
    pub const AGENT_ID: &str = "agent_";
    /// Default client id prefix (spec.md §4.7).
    pub const CLIENT_ID: &str = "client_";
}

/// Default scope granted when an `/authorize` request omits `scope`.
pub const DEFAULT_SCOPE: &str = "openid profile";

/// Environment-variable driven configuration defaults.
pub mod env_config {
    use std::env;

    fn var_or(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_owned())
    }

    /// `HTTP` listen port (`PORT`, default 8080).
    #[must_use]
    pub fn listen_port() -> u16 {
        var_or("PORT", "8080").parse().unwrap_or(8080)
    }

    /// Access-token TTL in seconds (`ACCESS_TOKEN_TTL_SECONDS`).
    #[must_use]
    pub fn access_token_ttl_secs() -> i64 {
        var_or(
            "ACCESS_TOKEN_TTL_SECONDS",
            &super::ttl::ACCESS_TOKEN_SECS.to_string(),
        )
        .parse()
        .unwrap_or(super::ttl::ACCESS_TOKEN_SECS)
    }

    /// Refresh-token TTL in seconds (`REFRESH_TOKEN_TTL_SECONDS`).
    #[must_use]
    pub fn refresh_token_ttl_secs() -> i64 {
        var_or(
            "REFRESH_TOKEN_TTL_SECONDS",
            &super::ttl::REFRESH_TOKEN_SECS.to_string(),
        )
        .parse()
        .unwrap_or(super::ttl::REFRESH_TOKEN_SECS)
    }

    /// Authorization-request TTL in seconds (`AUTH_REQUEST_TTL_SECONDS`).
    #[must_use]
    pub fn auth_request_ttl_secs() -> i64 {
        var_or(
            "AUTH_REQUEST_TTL_SECONDS",
            &super::ttl::AUTH_REQUEST_SECS.to_string(),
        )
        .parse()
        .unwrap_or(super::ttl::AUTH_REQUEST_SECS)
    }

    /// `JWT` issuer string (`JWT_ISSUER`).
    #[must_use]
    pub fn jwt_issuer() -> String {
        var_or("JWT_ISSUER", "https://agents.example.com")
    }

    /// Default scope string (`DEFAULT_SCOPE`).
    #[must_use]
    pub fn default_scope() -> String {
        var_or("DEFAULT_SCOPE", super::DEFAULT_SCOPE)
    }

    /// Log level (`RUST_LOG` style, `LOG_LEVEL` fallback).
    #[must_use]
    pub fn log_level() -> String {
        var_or("LOG_LEVEL", "info")
    }
}
