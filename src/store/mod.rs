// ABOUTME: In-memory keyed repository for all OAuth entities
// ABOUTME: Sole owner of mutable state; all mutation happens through inherent methods here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! The [`Store`], following the sharded-lock, entry-API pattern of the
//! teacher's `OAuth2RateLimiter` (spec.md §4.2). Every collection is a
//! `DashMap`; no other module ever reaches into a map directly, so a durable
//! backend can later replace this module without touching callers
//! (spec.md §9's pluggable-persistence note).

pub mod models;
pub mod sweeper;

use dashmap::DashMap;

use self::models::{Agent, AuthCode, AuthRequest, AuthRequestStatus, Client, RefreshEntry, Token};

/// The single mutable shared resource (spec.md §5).
#[derive(Debug, Default)]
pub struct Store {
    agents: DashMap<String, Agent>,
    clients: DashMap<String, Client>,
    auth_requests: DashMap<String, AuthRequest>,
    auth_codes: DashMap<String, AuthCode>,
    tokens: DashMap<String, Token>,
    tokens_by_access: DashMap<String, String>,
    refresh_entries: DashMap<String, RefreshEntry>,
}

impl Store {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Agents ----

    pub fn insert_agent(&self, agent: Agent) {
        self.agents.insert(agent.agent_id.clone(), agent);
    }

    #[must_use]
    pub fn get_agent(&self, agent_id: &str) -> Option<Agent> {
        self.agents.get(agent_id).map(|r| r.clone())
    }

    #[must_use]
    pub fn list_agents(&self) -> Vec<Agent> {
        self.agents.iter().map(|r| r.clone()).collect()
    }

    #[must_use]
    pub fn delete_agent(&self, agent_id: &str) -> bool {
        self.agents.remove(agent_id).is_some()
    }

    // ---- Clients ----

    pub fn insert_client(&self, client: Client) {
        self.clients.insert(client.client_id.clone(), client);
    }

    #[must_use]
    pub fn get_client(&self, client_id: &str) -> Option<Client> {
        self.clients.get(client_id).map(|r| r.clone())
    }

    #[must_use]
    pub fn list_clients(&self) -> Vec<Client> {
        self.clients.iter().map(|r| r.clone()).collect()
    }

    #[must_use]
    pub fn delete_client(&self, client_id: &str) -> bool {
        self.clients.remove(client_id).is_some()
    }

    /// Apply a partial update to a client, returning the updated record.
    pub fn update_client<F>(&self, client_id: &str, f: F) -> Option<Client>
    where
        F: FnOnce(&mut Client),
    {
        self.clients.get_mut(client_id).map(|mut entry| {
            f(&mut entry);
            entry.clone()
        })
    }

    // ---- AuthRequests ----

    pub fn insert_auth_request(&self, request: AuthRequest) {
        self.auth_requests
            .insert(request.request_id.clone(), request);
    }

    #[must_use]
    pub fn get_auth_request(&self, request_id: &str) -> Option<AuthRequest> {
        self.auth_requests.get(request_id).map(|r| r.clone())
    }

    /// Apply a mutation to an `AuthRequest` record in place and return the
    /// mutated clone, or `None` if it does not exist. The mutation closure
    /// runs while the shard lock is held, making read-modify-write atomic.
    pub fn mutate_auth_request<F>(&self, request_id: &str, f: F) -> Option<AuthRequest>
    where
        F: FnOnce(&mut AuthRequest),
    {
        self.auth_requests.get_mut(request_id).map(|mut entry| {
            f(&mut entry);
            entry.clone()
        })
    }

    /// Remove an `AuthRequest` unconditionally.
    pub fn delete_auth_request(&self, request_id: &str) -> Option<AuthRequest> {
        self.auth_requests.remove(request_id).map(|(_, v)| v)
    }

    /// Atomically observe-and-advance an `AuthRequest` for status polling:
    /// a `pending` request past its `expires_at` becomes `expired`, and an
    /// `authenticated` request becomes `completed`. Returns the record as it
    /// was *before* this call's transition, so the caller can tell whether
    /// it was the poll that delivered the code (spec.md §4.4, §5).
    pub fn poll_and_advance_auth_request(&self, request_id: &str, now: chrono::DateTime<chrono::Utc>) -> Option<AuthRequest> {
        self.auth_requests.get_mut(request_id).map(|mut entry| {
            let before = entry.clone();
            if entry.status == AuthRequestStatus::Pending && entry.is_expired(now) {
                entry.status = AuthRequestStatus::Expired;
            } else if entry.status == AuthRequestStatus::Authenticated {
                entry.status = AuthRequestStatus::Completed;
            }
            before
        })
    }

    #[must_use]
    pub fn list_auth_requests(&self) -> Vec<AuthRequest> {
        self.auth_requests.iter().map(|r| r.clone()).collect()
    }

    // ---- AuthCodes ----

    /// Bind a freshly minted code to its originating request (spec.md §4.2).
    pub fn bind_code(&self, code: &str, request_id: &str) {
        self.auth_codes.insert(
            code.to_owned(),
            AuthCode {
                code: code.to_owned(),
                request_id: request_id.to_owned(),
            },
        );
    }

    /// Resolve a code to its `request_id` without consuming it.
    #[must_use]
    pub fn resolve_code(&self, code: &str) -> Option<String> {
        self.auth_codes.get(code).map(|r| r.request_id.clone())
    }

    /// Consume (delete) a code, returning its `request_id` if it existed.
    ///
    /// This alone is not sufficient for the atomic "consume code, delete
    /// request, issue token" sequence required by spec.md §5 — callers must
    /// still ensure the code is deleted only once all prior checks (request
    /// match, PKCE, expiry) have passed, and only after the new `Token`/
    /// `RefreshEntry` are ready to persist.
    pub fn consume_code(&self, code: &str) -> Option<String> {
        self.auth_codes.remove(code).map(|(_, v)| v.request_id)
    }

    // ---- Tokens ----

    /// Persist a newly issued token, indexing it by its access-token string.
    pub fn insert_token(&self, token: Token) {
        self.tokens_by_access
            .insert(token.access_token.clone(), token.token_id.clone());
        self.tokens.insert(token.token_id.clone(), token);
    }

    #[must_use]
    pub fn get_token(&self, token_id: &str) -> Option<Token> {
        self.tokens.get(token_id).map(|r| r.clone())
    }

    /// Constant-time (hash-map) lookup by access-token string, per spec.md
    /// §9's recommended production shape.
    #[must_use]
    pub fn find_token_by_access(&self, access_token: &str) -> Option<Token> {
        let token_id = self.tokens_by_access.get(access_token)?.clone();
        self.get_token(&token_id)
    }

    /// Mark a token revoked. Idempotent: revoking an already-revoked or
    /// missing token is not an error.
    pub fn revoke_token(&self, token_id: &str) {
        if let Some(mut entry) = self.tokens.get_mut(token_id) {
            entry.revoked = true;
        }
    }

    // ---- RefreshEntries ----

    pub fn insert_refresh_entry(&self, entry: RefreshEntry) {
        self.refresh_entries
            .insert(entry.refresh_token.clone(), entry);
    }

    #[must_use]
    pub fn get_refresh_entry(&self, refresh_token: &str) -> Option<RefreshEntry> {
        self.refresh_entries.get(refresh_token).map(|r| r.clone())
    }

    /// Mark a refresh entry revoked. Idempotent.
    pub fn revoke_refresh(&self, refresh_token: &str) {
        if let Some(mut entry) = self.refresh_entries.get_mut(refresh_token) {
            entry.revoked = true;
        }
    }

    /// Repoint a refresh entry at the `Token` most recently issued against
    /// it. Refresh tokens are not rotated (spec.md §4.5), but each refresh
    /// grant mints a fresh `Token` row; without this, `revoke_token`'s
    /// cascade from a refresh token would keep targeting the token it was
    /// first issued alongside instead of the one currently in the caller's
    /// hands.
    pub fn rebind_refresh_entry(&self, refresh_token: &str, token_id: &str) {
        if let Some(mut entry) = self.refresh_entries.get_mut(refresh_token) {
            entry.token_id = token_id.to_owned();
        }
    }

    // ---- Sweeping ----

    /// Remove expired `AuthRequest` and `RefreshEntry` rows. Returns the
    /// number of rows removed, for logging.
    pub fn sweep_expired(&self, now: chrono::DateTime<chrono::Utc>) -> usize {
        let mut removed = 0;

        self.auth_requests.retain(|_, req| {
            let keep = !req.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        self.refresh_entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::Duration;

    fn sample_request(id: &str, expires_at: chrono::DateTime<chrono::Utc>) -> AuthRequest {
        AuthRequest {
            request_id: id.to_owned(),
            client_id: "client_1".to_owned(),
            redirect_uri: "https://example.com/cb".to_owned(),
            state: "xyz".to_owned(),
            code_challenge: "challenge".to_owned(),
            code_challenge_method: "S256".to_owned(),
            scope: "openid".to_owned(),
            status: models::AuthRequestStatus::Pending,
            code: None,
            agent_id: None,
            model: None,
            error: None,
            created_at: chrono::Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn sweep_removes_only_expired_requests() {
        let store = Store::new();
        let now = chrono::Utc::now();
        store.insert_auth_request(sample_request("req_expired", now - Duration::seconds(1)));
        store.insert_auth_request(sample_request("req_live", now + Duration::seconds(60)));

        let removed = store.sweep_expired(now);

        assert_eq!(removed, 1);
        assert!(store.get_auth_request("req_expired").is_none());
        assert!(store.get_auth_request("req_live").is_some());
    }

    #[test]
    fn consume_code_is_single_use() {
        let store = Store::new();
        store.bind_code("code_abc", "req_1");
        assert_eq!(store.consume_code("code_abc").as_deref(), Some("req_1"));
        assert_eq!(store.consume_code("code_abc"), None);
    }

    #[test]
    fn find_token_by_access_uses_index() {
        let store = Store::new();
        let now = chrono::Utc::now();
        store.insert_token(Token {
            token_id: "tok_1".to_owned(),
            access_token: "jwt.compact.string".to_owned(),
            refresh_token: "rt_1".to_owned(),
            agent_id: "agent_1".to_owned(),
            client_id: "client_1".to_owned(),
            model: "gpt-test".to_owned(),
            scope: "openid".to_owned(),
            access_expires_at: now + Duration::hours(1),
            refresh_expires_at: now + Duration::days(30),
            created_at: now,
            revoked: false,
        });

        let found = store
            .find_token_by_access("jwt.compact.string")
            .expect("token found");
        assert_eq!(found.token_id, "tok_1");
    }

    #[test]
    fn revoke_token_is_idempotent() {
        let store = Store::new();
        store.revoke_token("nonexistent");
        let now = chrono::Utc::now();
        store.insert_token(Token {
            token_id: "tok_1".to_owned(),
            access_token: "jwt".to_owned(),
            refresh_token: "rt_1".to_owned(),
            agent_id: "agent_1".to_owned(),
            client_id: "client_1".to_owned(),
            model: "gpt-test".to_owned(),
            scope: "openid".to_owned(),
            access_expires_at: now + Duration::hours(1),
            refresh_expires_at: now + Duration::days(30),
            created_at: now,
            revoked: false,
        });
        store.revoke_token("tok_1");
        store.revoke_token("tok_1");
        assert!(store.get_token("tok_1").expect("exists").revoked);
    }
}
