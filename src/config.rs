// ABOUTME: Environment configuration management for the agent OAuth server
// ABOUTME: Loads process-wide, immutable-at-runtime settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Environment-based configuration, following the `ServerConfig::from_env`
//! pattern of the teacher's `config::environment` module.

use crate::constants::env_config;
use anyhow::{Context, Result};

/// Process-wide configuration, initialized once at startup (spec.md §6).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `HTTP` listen port.
    pub listen_port: u16,
    /// Access-token `TTL`, in seconds.
    pub access_token_ttl_secs: i64,
    /// Refresh-token `TTL`, in seconds.
    pub refresh_token_ttl_secs: i64,
    /// Authorization-request (and authorization-code) `TTL`, in seconds.
    pub auth_request_ttl_secs: i64,
    /// `HMAC` key used to sign and verify access-token `JWT`s.
    pub jwt_secret: Vec<u8>,
    /// `JWT` `iss` claim and discovery-document issuer.
    pub issuer: String,
    /// Default scope granted when `/authorize` omits one.
    pub default_scope: String,
    /// `tracing` log level / filter directive.
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// documented defaults (spec.md §6's Configuration section).
    ///
    /// # Errors
    /// Returns an error if `JWT_SECRET` is set but empty, or if the loaded
    /// configuration otherwise fails [`Self::validate`].
    pub fn from_env() -> Result<Self> {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s.into_bytes(),
            Ok(_) => {
                anyhow::bail!("JWT_SECRET was set but empty");
            }
            Err(_) => {
                tracing::warn!(
                    "JWT_SECRET not set; generating an ephemeral secret for this process only"
                );
                crate::crypto::random::random_bytes(64)
            }
        };

        let config = Self {
            listen_port: env_config::listen_port(),
            access_token_ttl_secs: env_config::access_token_ttl_secs(),
            refresh_token_ttl_secs: env_config::refresh_token_ttl_secs(),
            auth_request_ttl_secs: env_config::auth_request_ttl_secs(),
            jwt_secret,
            issuer: env_config::jwt_issuer(),
            default_scope: env_config::default_scope(),
            log_level: env_config::log_level(),
        };

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// Sanity-check configuration values.
    ///
    /// # Errors
    /// Returns an error if any `TTL` is non-positive or the issuer is empty.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.access_token_ttl_secs > 0,
            "access_token_ttl_secs must be positive"
        );
        anyhow::ensure!(
            self.refresh_token_ttl_secs >= self.access_token_ttl_secs,
            "refresh_token_ttl_secs must be >= access_token_ttl_secs"
        );
        anyhow::ensure!(
            self.auth_request_ttl_secs > 0,
            "auth_request_ttl_secs must be positive"
        );
        anyhow::ensure!(!self.issuer.is_empty(), "issuer must not be empty");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn validate_rejects_inverted_ttls() {
        let mut config = ServerConfig {
            listen_port: 8080,
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 100,
            auth_request_ttl_secs: 600,
            jwt_secret: vec![0u8; 32],
            issuer: "https://example.com".to_owned(),
            default_scope: "openid".to_owned(),
            log_level: "info".to_owned(),
        };
        assert!(config.validate().is_err());
        config.refresh_token_ttl_secs = 999_999;
        assert!(config.validate().is_ok());
    }
}
