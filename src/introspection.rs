// ABOUTME: RFC 7662 token introspection and RFC 7009 token revocation
// ABOUTME: Validates JWT + store state for introspect; cascades revocation across access/refresh pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Introspection and revocation (spec.md §4.6). No standalone teacher
//! analogue exists for these endpoints; the JWT-validation half follows
//! `auth.rs`'s `validate_token_detailed`, combined here with store lookups
//! for the RFC 7662/7009 semantics spec.md describes.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::crypto;
use crate::errors::AppError;
use crate::store::Store;

/// Body of `POST /introspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectRequest {
    pub token: String,
    pub token_type_hint: Option<String>,
    pub client_id: String,
    pub client_secret: String,
}

/// Body of `POST /revoke`.
#[derive(Debug, Clone, Deserialize)]
pub struct RevokeRequest {
    pub token: String,
    pub token_type_hint: Option<String>,
    pub client_id: String,
    pub client_secret: String,
}

/// The introspection response (spec.md §4.6). `active:false` carries no
/// further detail, matching RFC 7662's guidance against oracle leakage.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum IntrospectResponse {
    Active {
        active: bool,
        scope: String,
        client_id: String,
        token_type: &'static str,
        exp: i64,
        iat: i64,
        sub: String,
        iss: String,
        model: String,
    },
    Inactive {
        active: bool,
    },
}

impl IntrospectResponse {
    fn inactive() -> Self {
        Self::Inactive { active: false }
    }
}

pub struct IntrospectionService {
    store: Arc<Store>,
    jwt_secret: Vec<u8>,
    issuer: String,
}

impl IntrospectionService {
    #[must_use]
    pub fn new(store: Arc<Store>, jwt_secret: Vec<u8>, issuer: impl Into<String>) -> Self {
        Self {
            store,
            jwt_secret,
            issuer: issuer.into(),
        }
    }

    /// `POST /introspect`.
    ///
    /// # Errors
    /// Returns `invalid_client` if the requesting client fails to
    /// authenticate; everything else that fails to validate yields
    /// `{active:false}` rather than an error.
    pub fn introspect(&self, req: &IntrospectRequest) -> Result<IntrospectResponse, AppError> {
        self.authenticate_client(&req.client_id, &req.client_secret)?;

        let hint = req.token_type_hint.as_deref();
        if hint == Some("refresh_token") {
            return Ok(self.introspect_refresh(&req.token, &req.client_id));
        }

        let as_access = self.introspect_access(&req.token, &req.client_id);
        if matches!(as_access, IntrospectResponse::Active { .. }) {
            return Ok(as_access);
        }
        Ok(self.introspect_refresh(&req.token, &req.client_id))
    }

    fn introspect_access(&self, token: &str, client_id: &str) -> IntrospectResponse {
        let now = Utc::now();

        let Ok(claims) = crypto::jwt::verify(token, &self.jwt_secret, &self.issuer) else {
            return IntrospectResponse::inactive();
        };
        let Some(record) = self.store.find_token_by_access(token) else {
            return IntrospectResponse::inactive();
        };
        if record.revoked || record.client_id != client_id || record.is_access_expired(now) {
            return IntrospectResponse::inactive();
        }

        IntrospectResponse::Active {
            active: true,
            scope: claims.scope,
            client_id: claims.client_id,
            token_type: "Bearer",
            exp: claims.exp,
            iat: claims.iat,
            sub: claims.sub,
            iss: claims.iss,
            model: claims.model,
        }
    }

    fn introspect_refresh(&self, token: &str, client_id: &str) -> IntrospectResponse {
        let now = Utc::now();

        let Some(entry) = self.store.get_refresh_entry(token) else {
            return IntrospectResponse::inactive();
        };
        if entry.revoked || entry.is_expired(now) || entry.client_id != client_id {
            return IntrospectResponse::inactive();
        }
        let Some(linked) = self.store.get_token(&entry.token_id) else {
            return IntrospectResponse::inactive();
        };

        IntrospectResponse::Active {
            active: true,
            scope: linked.scope,
            client_id: entry.client_id,
            token_type: "refresh_token",
            exp: entry.expires_at.timestamp(),
            iat: linked.created_at.timestamp(),
            sub: entry.agent_id,
            iss: self.issuer.clone(),
            model: linked.model,
        }
    }

    /// `POST /revoke`. Always succeeds once client credentials validate
    /// (RFC 7009), regardless of whether the token resolves.
    ///
    /// # Errors
    /// Returns `invalid_client` if the requesting client fails to
    /// authenticate; this is the only failure mode (spec.md §4.6).
    pub fn revoke(&self, req: &RevokeRequest) -> Result<(), AppError> {
        self.authenticate_client(&req.client_id, &req.client_secret)?;

        let hint = req.token_type_hint.as_deref();
        if hint == Some("refresh_token") {
            self.revoke_refresh_cascading(&req.token);
        } else if !self.revoke_access_cascading(&req.token) {
            self.revoke_refresh_cascading(&req.token);
        }
        Ok(())
    }

    /// Revoke by access-token string, cascading to its refresh token.
    /// Returns whether the token resolved as an access token at all.
    fn revoke_access_cascading(&self, token: &str) -> bool {
        let Some(record) = self.store.find_token_by_access(token) else {
            return false;
        };
        self.store.revoke_token(&record.token_id);
        self.store.revoke_refresh(&record.refresh_token);
        true
    }

    /// Revoke by refresh-token string, cascading to its linked access token.
    fn revoke_refresh_cascading(&self, token: &str) {
        if let Some(entry) = self.store.get_refresh_entry(token) {
            self.store.revoke_refresh(token);
            self.store.revoke_token(&entry.token_id);
        }
    }

    fn authenticate_client(&self, client_id: &str, client_secret: &str) -> Result<(), AppError> {
        let client = self
            .store
            .get_client(client_id)
            .ok_or_else(|| AppError::invalid_client("unknown client"))?;
        if !crypto::secrets::verify_secret(client_secret, &client.secret_hash)? {
            return Err(AppError::invalid_client("client authentication failed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::store::models::{Client, RefreshEntry, Token};
    use chrono::Duration;

    fn setup_with_token() -> (Arc<Store>, IntrospectionService, Token) {
        let store = Arc::new(Store::new());
        store.insert_client(Client {
            client_id: "client_a".to_owned(),
            secret_hash: crypto::secrets::hash_secret("secret-a").expect("hash"),
            name: "Client A".to_owned(),
            allowed_redirect_uris: vec![],
            allowed_grant_types: Client::default_grant_types(),
            created_at: Utc::now(),
        });
        store.insert_client(Client {
            client_id: "client_b".to_owned(),
            secret_hash: crypto::secrets::hash_secret("secret-b").expect("hash"),
            name: "Client B".to_owned(),
            allowed_redirect_uris: vec![],
            allowed_grant_types: Client::default_grant_types(),
            created_at: Utc::now(),
        });

        let service = IntrospectionService::new(
            Arc::clone(&store),
            b"test-secret".to_vec(),
            "https://agents.example.com",
        );

        let now = Utc::now();
        let claims = crypto::jwt::Claims {
            sub: "agent_1".to_owned(),
            client_id: "client_a".to_owned(),
            model: "gpt-test".to_owned(),
            scope: "openid".to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            iss: "https://agents.example.com".to_owned(),
        };
        let access_token = crypto::jwt::sign(&claims, b"test-secret").expect("sign");
        let token = Token {
            token_id: "tok_1".to_owned(),
            access_token,
            refresh_token: "rt_1".to_owned(),
            agent_id: "agent_1".to_owned(),
            client_id: "client_a".to_owned(),
            model: "gpt-test".to_owned(),
            scope: "openid".to_owned(),
            access_expires_at: now + Duration::hours(1),
            refresh_expires_at: now + Duration::days(30),
            created_at: now,
            revoked: false,
        };
        store.insert_token(token.clone());
        store.insert_refresh_entry(RefreshEntry {
            refresh_token: "rt_1".to_owned(),
            token_id: "tok_1".to_owned(),
            agent_id: "agent_1".to_owned(),
            client_id: "client_a".to_owned(),
            expires_at: now + Duration::days(30),
            revoked: false,
        });

        (store, service, token)
    }

    #[test]
    fn introspect_active_access_token() {
        let (_store, service, token) = setup_with_token();
        let response = service
            .introspect(&IntrospectRequest {
                token: token.access_token,
                token_type_hint: None,
                client_id: "client_a".to_owned(),
                client_secret: "secret-a".to_owned(),
            })
            .expect("introspect");
        assert!(matches!(
            response,
            IntrospectResponse::Active { active: true, .. }
        ));
    }

    #[test]
    fn cross_client_introspection_is_inactive() {
        let (_store, service, token) = setup_with_token();
        let response = service
            .introspect(&IntrospectRequest {
                token: token.access_token,
                token_type_hint: None,
                client_id: "client_b".to_owned(),
                client_secret: "secret-b".to_owned(),
            })
            .expect("introspect");
        assert!(matches!(response, IntrospectResponse::Inactive { active: false }));
    }

    #[test]
    fn revoke_cascades_across_access_and_refresh() {
        let (store, service, token) = setup_with_token();
        service
            .revoke(&RevokeRequest {
                token: "rt_1".to_owned(),
                token_type_hint: Some("refresh_token".to_owned()),
                client_id: "client_a".to_owned(),
                client_secret: "secret-a".to_owned(),
            })
            .expect("revoke");

        assert!(store.get_token("tok_1").expect("token exists").revoked);
        assert!(
            store
                .get_refresh_entry("rt_1")
                .expect("entry exists")
                .revoked
        );

        let response = service
            .introspect(&IntrospectRequest {
                token: token.access_token,
                token_type_hint: None,
                client_id: "client_a".to_owned(),
                client_secret: "secret-a".to_owned(),
            })
            .expect("introspect");
        assert!(matches!(response, IntrospectResponse::Inactive { active: false }));
    }

    #[test]
    fn revoke_is_idempotent() {
        let (_store, service, _token) = setup_with_token();
        for _ in 0..2 {
            service
                .revoke(&RevokeRequest {
                    token: "rt_1".to_owned(),
                    token_type_hint: Some("refresh_token".to_owned()),
                    client_id: "client_a".to_owned(),
                    client_secret: "secret-a".to_owned(),
                })
                .expect("revoke");
        }
    }

    #[test]
    fn revoke_with_bad_client_credentials_fails() {
        let (_store, service, _token) = setup_with_token();
        let result = service.revoke(&RevokeRequest {
            token: "rt_1".to_owned(),
            token_type_hint: None,
            client_id: "client_a".to_owned(),
            client_secret: "wrong".to_owned(),
        });
        assert!(result.is_err());
    }
}
