// ABOUTME: Entity types persisted by the in-memory store
// ABOUTME: Agent, Client, AuthRequest, AuthCode, Token, and RefreshEntry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Data model, as specified in spec.md §3.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A non-human principal authenticating with its own credential pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    pub secret_hash: String,
    pub user_email: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// A relying website registered with the authorization server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    pub secret_hash: String,
    pub name: String,
    pub allowed_redirect_uris: Vec<String>,
    pub allowed_grant_types: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Default grant types for a freshly registered client (spec.md §3).
    #[must_use]
    pub fn default_grant_types() -> Vec<String> {
        vec!["authorization_code".to_owned(), "refresh_token".to_owned()]
    }
}

/// Status of an in-flight authorization request (spec.md §4.4's state machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthRequestStatus {
    Pending,
    Authenticated,
    Completed,
    Expired,
    Error,
}

/// The server-side record of an in-flight authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub request_id: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub state: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
    pub scope: String,
    pub status: AuthRequestStatus,
    pub code: Option<String>,
    pub agent_id: Option<String>,
    pub model: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthRequest {
    /// Whether `now` is past this request's `expires_at`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A single-use authorization code bound to an [`AuthRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCode {
    pub code: String,
    pub request_id: String,
}

/// An issued access-token record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub token_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub agent_id: String,
    pub client_id: String,
    pub model: String,
    pub scope: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Token {
    /// Whether `now` is past this token's access-token expiry.
    #[must_use]
    pub fn is_access_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.access_expires_at
    }
}

/// A refresh-token record, kept separately so it can outlive its originating
/// [`Token`] across non-rotating refresh grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshEntry {
    pub refresh_token: String,
    pub token_id: String,
    pub agent_id: String,
    pub client_id: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshEntry {
    /// Whether `now` is past this entry's expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
