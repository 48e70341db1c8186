// ABOUTME: Authorization-code and refresh-token grant handling
// ABOUTME: Issues JWT access tokens and opaque, non-rotating refresh tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Token service (spec.md §4.5).
//!
//! Client authentication, grant-type dispatch, and the authorization-code
//! exchange order of checks follow `OAuth2AuthorizationServer::token` /
//! `validate_and_consume_auth_code`. Refresh tokens are **not rotated** by
//! default — spec.md explicitly prescribes this "to match existing
//! behavior" (recorded as an Open Question decision in DESIGN.md), which
//! differs from the teacher's own current rotating implementation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::prefix;
use crate::crypto;
use crate::errors::AppError;
use crate::store::models::{RefreshEntry, Token};
use crate::store::Store;

/// Body of `POST /token` (both grant types share one wire shape; unused
/// fields for a given `grant_type` are ignored).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub redirect_uri: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: String,
    pub client_secret: String,
}

/// The token response shape shared by both grants (RFC 6749 §5.1).
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub refresh_token: String,
    pub scope: String,
}

pub struct TokenService {
    store: Arc<Store>,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    jwt_secret: Vec<u8>,
    issuer: String,
}

impl TokenService {
    #[must_use]
    pub fn new(
        store: Arc<Store>,
        access_token_ttl_secs: i64,
        refresh_token_ttl_secs: i64,
        jwt_secret: Vec<u8>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            store,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            refresh_token_ttl: Duration::seconds(refresh_token_ttl_secs),
            jwt_secret,
            issuer: issuer.into(),
        }
    }

    /// `POST /token`: dispatch on `grant_type`.
    ///
    /// # Errors
    /// See spec.md §4.5 for the full error taxonomy per grant type.
    pub fn handle(&self, req: &TokenRequest) -> Result<TokenResponse, AppError> {
        let client = self.authenticate_client(&req.client_id, &req.client_secret)?;

        match req.grant_type.as_str() {
            "authorization_code" => self.authorization_code_grant(req, &client.client_id),
            "refresh_token" => self.refresh_token_grant(req, &client.client_id),
            _ => Err(AppError::unsupported_grant_type()),
        }
    }

    fn authenticate_client(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<crate::store::models::Client, AppError> {
        let client = self
            .store
            .get_client(client_id)
            .ok_or_else(|| AppError::invalid_client("unknown client"))?;
        if !crypto::secrets::verify_secret(client_secret, &client.secret_hash)? {
            return Err(AppError::invalid_client("client authentication failed"));
        }
        Ok(client)
    }

    fn authorization_code_grant(
        &self,
        req: &TokenRequest,
        client_id: &str,
    ) -> Result<TokenResponse, AppError> {
        let code = req
            .code
            .as_deref()
            .ok_or_else(|| AppError::invalid_request("code is required"))?;
        let code_verifier = req
            .code_verifier
            .as_deref()
            .ok_or_else(|| AppError::invalid_request("code_verifier is required"))?;

        let request_id = self
            .store
            .resolve_code(code)
            .ok_or_else(|| AppError::invalid_grant("code does not resolve"))?;

        let auth_request = self
            .store
            .get_auth_request(&request_id)
            .ok_or_else(|| AppError::invalid_grant("authorization request no longer exists"))?;

        if auth_request.code.as_deref() != Some(code) {
            return Err(AppError::invalid_grant("code does not match"));
        }
        if auth_request.client_id != client_id {
            return Err(AppError::invalid_grant(
                "code was not issued to this client",
            ));
        }
        if !crypto::pkce::verify_s256(code_verifier, &auth_request.code_challenge) {
            // Consume the code on a failed verifier too, so a second attempt
            // with the right verifier still fails (spec.md §8 scenario 3).
            self.store.consume_code(code);
            self.store.delete_auth_request(&request_id);
            return Err(AppError::invalid_grant("PKCE verification failed"));
        }

        let now = Utc::now();
        if auth_request.is_expired(now) {
            self.store.consume_code(code);
            self.store.delete_auth_request(&request_id);
            return Err(AppError::invalid_grant("authorization request has expired"));
        }

        let agent_id = auth_request
            .agent_id
            .clone()
            .ok_or_else(|| AppError::server_error("authenticated request missing agent_id"))?;
        let model = auth_request
            .model
            .clone()
            .ok_or_else(|| AppError::server_error("authenticated request missing model"))?;

        let response = self.issue_token(&agent_id, client_id, &model, &auth_request.scope, now)?;

        // Single-use: delete the code last, after the token is durably
        // persisted, per spec.md §5's ordering requirement.
        self.store.consume_code(code);
        self.store.delete_auth_request(&request_id);

        Ok(response)
    }

    fn refresh_token_grant(
        &self,
        req: &TokenRequest,
        client_id: &str,
    ) -> Result<TokenResponse, AppError> {
        let refresh_token = req
            .refresh_token
            .as_deref()
            .ok_or_else(|| AppError::invalid_request("refresh_token is required"))?;

        let entry = self
            .store
            .get_refresh_entry(refresh_token)
            .ok_or_else(|| AppError::invalid_grant("refresh token does not resolve"))?;

        let now = Utc::now();
        if entry.revoked || entry.is_expired(now) {
            return Err(AppError::invalid_grant("refresh token is revoked or expired"));
        }
        if entry.client_id != client_id {
            return Err(AppError::invalid_grant(
                "refresh token was not issued to this client",
            ));
        }

        let original_token = self
            .store
            .get_token(&entry.token_id)
            .ok_or_else(|| AppError::server_error("refresh entry has no linked token"))?;

        let new_token_id = Uuid::new_v4().to_string();
        let access_expires_at = now + self.access_token_ttl;
        let claims = crypto::jwt::Claims {
            sub: entry.agent_id.clone(),
            client_id: client_id.to_owned(),
            model: original_token.model.clone(),
            scope: original_token.scope.clone(),
            iat: now.timestamp(),
            exp: access_expires_at.timestamp(),
            iss: self.issuer.clone(),
        };
        let access_token = crypto::jwt::sign(&claims, &self.jwt_secret)?;

        self.store.insert_token(Token {
            token_id: new_token_id.clone(),
            access_token: access_token.clone(),
            refresh_token: refresh_token.to_owned(),
            agent_id: entry.agent_id.clone(),
            client_id: client_id.to_owned(),
            model: original_token.model.clone(),
            scope: original_token.scope.clone(),
            access_expires_at,
            // Not rotated: preserve the existing refresh expiry.
            refresh_expires_at: entry.expires_at,
            created_at: now,
            revoked: false,
        });
        // Keep the refresh entry pointed at the token it was most recently
        // used to mint, so revoking it cascades to the token now in use.
        self.store.rebind_refresh_entry(refresh_token, &new_token_id);

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer",
            expires_in: self.access_token_ttl.num_seconds(),
            refresh_token: refresh_token.to_owned(),
            scope: original_token.scope,
        })
    }

    fn issue_token(
        &self,
        agent_id: &str,
        client_id: &str,
        model: &str,
        scope: &str,
        now: chrono::DateTime<Utc>,
    ) -> Result<TokenResponse, AppError> {
        let token_id = Uuid::new_v4().to_string();
        let access_expires_at = now + self.access_token_ttl;
        let refresh_expires_at = now + self.refresh_token_ttl;

        let claims = crypto::jwt::Claims {
            sub: agent_id.to_owned(),
            client_id: client_id.to_owned(),
            model: model.to_owned(),
            scope: scope.to_owned(),
            iat: now.timestamp(),
            exp: access_expires_at.timestamp(),
            iss: self.issuer.clone(),
        };
        let access_token = crypto::jwt::sign(&claims, &self.jwt_secret)?;
        let refresh_token = crypto::random::random_id(prefix::REFRESH_TOKEN);

        self.store.insert_token(Token {
            token_id: token_id.clone(),
            access_token: access_token.clone(),
            refresh_token: refresh_token.clone(),
            agent_id: agent_id.to_owned(),
            client_id: client_id.to_owned(),
            model: model.to_owned(),
            scope: scope.to_owned(),
            access_expires_at,
            refresh_expires_at,
            created_at: now,
            revoked: false,
        });

        self.store.insert_refresh_entry(RefreshEntry {
            refresh_token: refresh_token.clone(),
            token_id,
            agent_id: agent_id.to_owned(),
            client_id: client_id.to_owned(),
            expires_at: refresh_expires_at,
            revoked: false,
        });

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer",
            expires_in: self.access_token_ttl.num_seconds(),
            refresh_token,
            scope: scope.to_owned(),
        })
    }
}
