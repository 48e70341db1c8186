// ABOUTME: Admin provisioning of agents and clients
// ABOUTME: Generates credentials, persists only hashes, reveals secrets exactly once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Admin registration (spec.md §4.7), grounded on `admin/models.rs`'s
//! "reveal the secret once" pattern and `client_registration.rs::register_client`'s
//! default-generation-then-store flow.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::prefix;
use crate::crypto;
use crate::errors::AppError;
use crate::store::models::{Agent, Client};
use crate::store::Store;
use crate::validation;

/// Body of `POST /api/admin/agents`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgentRequest {
    pub user_email: String,
    pub user_name: String,
    pub agent_id: Option<String>,
}

/// The plaintext secret is present only in the response to the creation
/// call; it is never recoverable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentResponse {
    pub agent_id: String,
    pub agent_secret: String,
    pub user_email: String,
    pub user_name: String,
    pub warning: &'static str,
}

/// An agent record as returned by list/get, without its secret hash.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub agent_id: String,
    pub user_email: String,
    pub user_name: String,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<Agent> for AgentSummary {
    fn from(agent: Agent) -> Self {
        Self {
            agent_id: agent.agent_id,
            user_email: agent.user_email,
            user_name: agent.user_name,
            created_at: agent.created_at,
        }
    }
}

/// Body of `POST /api/admin/clients`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRequest {
    pub client_name: String,
    pub redirect_uris: Vec<String>,
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateClientResponse {
    pub client_id: String,
    pub client_secret: String,
    pub name: String,
    pub allowed_redirect_uris: Vec<String>,
    pub allowed_grant_types: Vec<String>,
    pub warning: &'static str,
}

/// A client record as returned by list/get, without its secret hash.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub client_id: String,
    pub name: String,
    pub allowed_redirect_uris: Vec<String>,
    pub allowed_grant_types: Vec<String>,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<Client> for ClientSummary {
    fn from(client: Client) -> Self {
        Self {
            client_id: client.client_id,
            name: client.name,
            allowed_redirect_uris: client.allowed_redirect_uris,
            allowed_grant_types: client.allowed_grant_types,
            created_at: client.created_at,
        }
    }
}

/// Partial update body for `PUT /api/admin/clients/:id`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateClientRequest {
    pub client_name: Option<String>,
    pub redirect_uris: Option<Vec<String>>,
}

const SECRET_NOT_RECOVERABLE_WARNING: &str =
    "This secret is shown only once and cannot be recovered. Store it securely now.";

pub struct AdminService {
    store: Arc<Store>,
}

impl AdminService {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// `POST /api/admin/agents`.
    ///
    /// # Errors
    /// Returns `invalid_request` for a malformed email or a colliding
    /// `agent_id`.
    pub fn create_agent(&self, req: &CreateAgentRequest) -> Result<CreateAgentResponse, AppError> {
        if !validation::is_valid_email(&req.user_email) {
            return Err(AppError::invalid_request("user_email is not a valid email address"));
        }

        let agent_id = match &req.agent_id {
            Some(id) => {
                if !validation::is_valid_identifier(id) {
                    return Err(AppError::invalid_request(
                        "agent_id must be at least 3 chars of [A-Za-z0-9_-]",
                    ));
                }
                if self.store.get_agent(id).is_some() {
                    return Err(AppError::invalid_request("agent_id already exists"));
                }
                id.clone()
            }
            None => self.fresh_agent_id(),
        };

        let agent_secret = base64_random32();
        let secret_hash = crypto::secrets::hash_secret(&agent_secret)?;

        let agent = Agent {
            agent_id: agent_id.clone(),
            secret_hash,
            user_email: req.user_email.clone(),
            user_name: req.user_name.clone(),
            created_at: Utc::now(),
        };
        self.store.insert_agent(agent);

        tracing::info!(agent_id = %agent_id, "agent created");
        Ok(CreateAgentResponse {
            agent_id,
            agent_secret,
            user_email: req.user_email.clone(),
            user_name: req.user_name.clone(),
            warning: SECRET_NOT_RECOVERABLE_WARNING,
        })
    }

    #[must_use]
    pub fn list_agents(&self) -> Vec<AgentSummary> {
        self.store.list_agents().into_iter().map(Into::into).collect()
    }

    /// # Errors
    /// Returns `not_found` if no agent with `agent_id` exists.
    pub fn get_agent(&self, agent_id: &str) -> Result<AgentSummary, AppError> {
        self.store
            .get_agent(agent_id)
            .map(Into::into)
            .ok_or_else(|| AppError::not_found("agent not found"))
    }

    /// # Errors
    /// Returns `not_found` if no agent with `agent_id` exists.
    pub fn delete_agent(&self, agent_id: &str) -> Result<(), AppError> {
        if self.store.delete_agent(agent_id) {
            Ok(())
        } else {
            Err(AppError::not_found("agent not found"))
        }
    }

    /// `POST /api/admin/clients`.
    ///
    /// # Errors
    /// Returns `invalid_request` for a malformed redirect URI or a
    /// colliding `client_id`.
    pub fn create_client(&self, req: &CreateClientRequest) -> Result<CreateClientResponse, AppError> {
        for uri in &req.redirect_uris {
            if !validation::is_valid_redirect_uri_candidate(uri) {
                return Err(AppError::invalid_request(format!(
                    "redirect_uri '{uri}' is not a valid absolute https (or loopback) URL"
                )));
            }
        }

        let client_id = match &req.client_id {
            Some(id) => {
                if !validation::is_valid_identifier(id) {
                    return Err(AppError::invalid_request(
                        "client_id must be at least 3 chars of [A-Za-z0-9_-]",
                    ));
                }
                if self.store.get_client(id).is_some() {
                    return Err(AppError::invalid_request("client_id already exists"));
                }
                id.clone()
            }
            None => self.fresh_client_id(),
        };

        let client_secret = base64_random32();
        let secret_hash = crypto::secrets::hash_secret(&client_secret)?;
        let allowed_grant_types = Client::default_grant_types();

        let client = Client {
            client_id: client_id.clone(),
            secret_hash,
            name: req.client_name.clone(),
            allowed_redirect_uris: req.redirect_uris.clone(),
            allowed_grant_types: allowed_grant_types.clone(),
            created_at: Utc::now(),
        };
        self.store.insert_client(client);

        tracing::info!(client_id = %client_id, "client created");
        Ok(CreateClientResponse {
            client_id,
            client_secret,
            name: req.client_name.clone(),
            allowed_redirect_uris: req.redirect_uris.clone(),
            allowed_grant_types,
            warning: SECRET_NOT_RECOVERABLE_WARNING,
        })
    }

    #[must_use]
    pub fn list_clients(&self) -> Vec<ClientSummary> {
        self.store.list_clients().into_iter().map(Into::into).collect()
    }

    /// # Errors
    /// Returns `not_found` if no client with `client_id` exists.
    pub fn get_client(&self, client_id: &str) -> Result<ClientSummary, AppError> {
        self.store
            .get_client(client_id)
            .map(Into::into)
            .ok_or_else(|| AppError::not_found("client not found"))
    }

    /// `PUT /api/admin/clients/:id`: partial update of name and/or redirect URIs.
    ///
    /// # Errors
    /// Returns `invalid_request` for a malformed redirect URI, or
    /// `not_found` if no client with `client_id` exists.
    pub fn update_client(
        &self,
        client_id: &str,
        req: &UpdateClientRequest,
    ) -> Result<ClientSummary, AppError> {
        if let Some(uris) = &req.redirect_uris {
            for uri in uris {
                if !validation::is_valid_redirect_uri_candidate(uri) {
                    return Err(AppError::invalid_request(format!(
                        "redirect_uri '{uri}' is not a valid absolute https (or loopback) URL"
                    )));
                }
            }
        }

        let name = req.client_name.clone();
        let redirect_uris = req.redirect_uris.clone();

        self.store
            .update_client(client_id, move |client| {
                if let Some(name) = name {
                    client.name = name;
                }
                if let Some(uris) = redirect_uris {
                    client.allowed_redirect_uris = uris;
                }
            })
            .map(Into::into)
            .ok_or_else(|| AppError::not_found("client not found"))
    }

    /// # Errors
    /// Returns `not_found` if no client with `client_id` exists.
    pub fn delete_client(&self, client_id: &str) -> Result<(), AppError> {
        if self.store.delete_client(client_id) {
            Ok(())
        } else {
            Err(AppError::not_found("client not found"))
        }
    }

    fn fresh_agent_id(&self) -> String {
        loop {
            let candidate = crypto::random::random_id(prefix::AGENT_ID);
            if self.store.get_agent(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn fresh_client_id(&self) -> String {
        loop {
            let candidate = crypto::random::random_id(prefix::CLIENT_ID);
            if self.store.get_client(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

fn base64_random32() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use zeroize::Zeroize;

    let mut raw = crypto::random::random_bytes(32);
    let encoded = URL_SAFE_NO_PAD.encode(&raw);
    raw.zeroize();
    encoded
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn create_agent_rejects_invalid_email() {
        let service = AdminService::new(Arc::new(Store::new()));
        let result = service.create_agent(&CreateAgentRequest {
            user_email: "not-an-email".to_owned(),
            user_name: "Test".to_owned(),
            agent_id: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn create_agent_generates_id_and_secret_shown_once() {
        let service = AdminService::new(Arc::new(Store::new()));
        let response = service
            .create_agent(&CreateAgentRequest {
                user_email: "user@example.com".to_owned(),
                user_name: "Test User".to_owned(),
                agent_id: None,
            })
            .expect("create agent");
        assert!(response.agent_id.starts_with("agent_"));
        assert!(!response.agent_secret.is_empty());
    }

    #[test]
    fn create_client_rejects_invalid_redirect_uri() {
        let service = AdminService::new(Arc::new(Store::new()));
        let result = service.create_client(&CreateClientRequest {
            client_name: "Test Client".to_owned(),
            redirect_uris: vec!["http://example.com/cb".to_owned()],
            client_id: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn update_client_partial_update_preserves_other_fields() {
        let service = AdminService::new(Arc::new(Store::new()));
        let created = service
            .create_client(&CreateClientRequest {
                client_name: "Original Name".to_owned(),
                redirect_uris: vec!["https://example.com/cb".to_owned()],
                client_id: None,
            })
            .expect("create client");

        let updated = service
            .update_client(
                &created.client_id,
                &UpdateClientRequest {
                    client_name: Some("New Name".to_owned()),
                    redirect_uris: None,
                },
            )
            .expect("update client");

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.allowed_redirect_uris, vec!["https://example.com/cb".to_owned()]);
    }

    #[test]
    fn delete_agent_not_found() {
        let service = AdminService::new(Arc::new(Store::new()));
        assert!(service.delete_agent("no-such-agent").is_err());
    }
}
