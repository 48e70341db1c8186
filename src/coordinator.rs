// ABOUTME: Authorization-request state machine: begin, agent authentication, status polling
// ABOUTME: The heart of the system per spec.md §4.4 — pending/authenticated/completed/expired/error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Authorization request coordinator.
//!
//! No direct teacher analogue exists for the agent back-channel handshake
//! (the teacher auto-approves at `/authorize`); the validation order and
//! error taxonomy are grounded in `OAuth2AuthorizationServer::authorize`,
//! while the `pending -> authenticated -> completed/expired/error` machinery
//! is new logic written in the teacher's idiom: small focused methods,
//! `tracing` at each transition, `AppError`-typed failures.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{prefix, DEFAULT_SCOPE};
use crate::crypto;
use crate::errors::AppError;
use crate::store::models::{AuthRequest, AuthRequestStatus};
use crate::store::Store;
use crate::validation;

/// Query parameters accepted by `GET /authorize` (spec.md §4.4).
///
/// Every field the spec calls "required" is still declared `Option<String>`
/// here: a missing field must surface as the mandated HTML error page, not
/// as Axum's bare `400` `Query` extractor rejection, so presence is checked
/// inside [`Coordinator::begin_authorization`] instead of at deserialization
/// time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BeginAuthorizationParams {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub scope: Option<String>,
}

/// Body of `POST /api/agent/authenticate` (spec.md §4.4).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateAgentRequest {
    pub request_id: String,
    pub agent_id: String,
    pub agent_secret: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticateAgentResponse {
    pub success: bool,
}

/// The status document returned by `poll_status` (spec.md §4.4).
///
/// `Debug` is implemented by hand below to avoid printing the authorization
/// code into logs.
#[derive(Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusDocument {
    Pending,
    Error {
        error: String,
    },
    Authenticated {
        code: String,
        state: String,
        redirect_uri: String,
    },
    /// Returned once the code has already been delivered to a prior poll;
    /// behaves identically to `Pending` from the caller's perspective (no
    /// code is ever returned twice) but is kept distinct for observability.
    Completed,
}

/// The authorization-request coordinator, holding only a handle to the
/// shared [`Store`] — it owns no state of its own (spec.md §5: the Store is
/// the sole mutable shared resource).
pub struct Coordinator {
    store: Arc<Store>,
    auth_request_ttl: Duration,
    default_scope: String,
}

impl Coordinator {
    #[must_use]
    pub fn new(store: Arc<Store>, auth_request_ttl_secs: i64, default_scope: impl Into<String>) -> Self {
        Self {
            store,
            auth_request_ttl: Duration::seconds(auth_request_ttl_secs),
            default_scope: default_scope.into(),
        }
    }

    /// `GET /authorize`: validate the request and create a pending
    /// `AuthRequest`. Returns the created request so the HTTP layer can
    /// render the landing page around it.
    ///
    /// # Errors
    /// Returns an [`AppError`] for any malformed or unresolvable input;
    /// per spec.md §4.4 these are always rendered as HTML error pages by
    /// the caller, never as redirects to an unverified `redirect_uri`.
    pub fn begin_authorization(&self, params: &BeginAuthorizationParams) -> Result<AuthRequest, AppError> {
        let response_type = non_empty(&params.response_type, "response_type")?;
        let client_id = non_empty(&params.client_id, "client_id")?;
        let redirect_uri = non_empty(&params.redirect_uri, "redirect_uri")?;
        let state = non_empty(&params.state, "state")?;
        let code_challenge = non_empty(&params.code_challenge, "code_challenge")?;
        let code_challenge_method = non_empty(&params.code_challenge_method, "code_challenge_method")?;

        if response_type != "code" {
            return Err(AppError::unsupported_response_type());
        }
        if !validation::is_valid_challenge_method(code_challenge_method) {
            return Err(AppError::invalid_request(
                "code_challenge_method must be S256",
            ));
        }

        let client = self
            .store
            .get_client(client_id)
            .ok_or_else(|| AppError::invalid_request("client_id does not resolve"))?;

        if !validation::redirect_uri_is_allowed(redirect_uri, &client.allowed_redirect_uris) {
            return Err(AppError::invalid_request(
                "redirect_uri is not registered for this client",
            ));
        }

        let now = Utc::now();
        let scope = params
            .scope
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                if self.default_scope.is_empty() {
                    DEFAULT_SCOPE.to_owned()
                } else {
                    self.default_scope.clone()
                }
            });

        let request = AuthRequest {
            request_id: Uuid::new_v4().to_string(),
            client_id: client_id.to_owned(),
            redirect_uri: redirect_uri.to_owned(),
            state: state.to_owned(),
            code_challenge: code_challenge.to_owned(),
            code_challenge_method: code_challenge_method.to_owned(),
            scope,
            status: AuthRequestStatus::Pending,
            code: None,
            agent_id: None,
            model: None,
            error: None,
            created_at: now,
            expires_at: now + self.auth_request_ttl,
        };

        self.store.insert_auth_request(request.clone());
        tracing::info!(request_id = %request.request_id, client_id = %request.client_id, "authorization request created");
        Ok(request)
    }

    /// `POST /api/agent/authenticate`: the back-channel agent login.
    ///
    /// # Errors
    /// Returns `not_found` if the request id does not resolve, `invalid_request`
    /// if it is not pending, `request_expired` if its TTL has elapsed, and
    /// `invalid_client` if the agent credentials fail to verify (which also
    /// terminates the request per spec.md's one-shot failure policy).
    pub fn authenticate_agent(
        &self,
        req: &AuthenticateAgentRequest,
    ) -> Result<AuthenticateAgentResponse, AppError> {
        let current = self
            .store
            .get_auth_request(&req.request_id)
            .ok_or_else(|| AppError::not_found("authorization request not found"))?;

        let now = Utc::now();

        if current.status == AuthRequestStatus::Pending && current.is_expired(now) {
            self.store.mutate_auth_request(&req.request_id, |r| {
                r.status = AuthRequestStatus::Expired;
            });
            return Err(AppError::request_expired());
        }

        if current.status != AuthRequestStatus::Pending {
            return Err(AppError::invalid_request(format!(
                "authorization request is not pending (status: {:?})",
                current.status
            )));
        }

        let agent = self.store.get_agent(&req.agent_id);
        let verified = match &agent {
            Some(agent) => crypto::secrets::verify_secret(&req.agent_secret, &agent.secret_hash)?,
            None => false,
        };

        if !verified {
            self.store.mutate_auth_request(&req.request_id, |r| {
                r.status = AuthRequestStatus::Error;
                r.error = Some("Invalid agent credentials".to_owned());
            });
            tracing::warn!(request_id = %req.request_id, agent_id = %req.agent_id, "agent authentication failed");
            return Err(AppError::invalid_client("Invalid agent credentials"));
        }

        let code = crypto::random::random_id(prefix::AUTH_CODE);
        self.store.mutate_auth_request(&req.request_id, |r| {
            r.agent_id = Some(req.agent_id.clone());
            r.model = Some(req.model.clone());
            r.code = Some(code.clone());
            r.status = AuthRequestStatus::Authenticated;
        });
        self.store.bind_code(&code, &req.request_id);

        tracing::info!(request_id = %req.request_id, agent_id = %req.agent_id, "agent authenticated");
        Ok(AuthenticateAgentResponse { success: true })
    }

    /// `GET /api/check-status`: the browser's polling endpoint.
    ///
    /// # Errors
    /// Returns `not_found` if the request id does not resolve.
    pub fn poll_status(&self, request_id: &str) -> Result<StatusDocument, AppError> {
        let now = Utc::now();

        // Atomically observe-and-advance so the authenticated -> completed
        // transition happens for at most one poll (spec.md §5). `before`
        // reflects the state as it was *prior* to this call's transition,
        // which is what determines what we report back.
        let before = self
            .store
            .poll_and_advance_auth_request(request_id, now)
            .ok_or_else(|| AppError::not_found("authorization request not found"))?;

        Ok(Self::status_document_for(&before, now))
    }

    fn status_document_for(before: &AuthRequest, now: chrono::DateTime<Utc>) -> StatusDocument {
        match before.status {
            AuthRequestStatus::Pending if before.is_expired(now) => StatusDocument::Error {
                error: "Authorization request has expired".to_owned(),
            },
            AuthRequestStatus::Pending => StatusDocument::Pending,
            AuthRequestStatus::Error => StatusDocument::Error {
                error: before.error.clone().unwrap_or_default(),
            },
            AuthRequestStatus::Expired => StatusDocument::Error {
                error: "Authorization request has expired".to_owned(),
            },
            AuthRequestStatus::Completed => StatusDocument::Completed,
            AuthRequestStatus::Authenticated => StatusDocument::Authenticated {
                code: before.code.clone().unwrap_or_default(),
                state: before.state.clone(),
                redirect_uri: before.redirect_uri.clone(),
            },
        }
    }
}

/// Require that an optional query parameter is present and non-empty,
/// producing the same `invalid_request` [`AppError`] whether it was omitted
/// from the query string entirely or supplied as an empty string.
fn non_empty<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AppError> {
    match value.as_deref() {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(AppError::invalid_request(format!("{field} is required"))),
    }
}

/// Render the HTML landing page embedding `request_id`, for the browser's
/// polling script and the controlling agent to read (spec.md §1, §4.4). The
/// real template lives in an external collaborator; this is a minimal
/// stand-in so the server is exercisable end-to-end.
#[must_use]
pub fn render_authorize_page(request_id: &str) -> String {
    let escaped = html_escape::encode_double_quoted_attribute(request_id);
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Authorizing</title></head>\n\
<body data-request-id=\"{escaped}\">\n\
<p>Waiting for agent authorization&hellip;</p>\n\
</body>\n</html>\n"
    )
}

/// Render a human-readable HTML error page for `/authorize` failures
/// (spec.md §4.4: errors never redirect to an unverified `redirect_uri`).
#[must_use]
pub fn render_authorize_error_page(error: &AppError) -> String {
    let escaped = html_escape::encode_text(&error.to_string());
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Authorization Error</title></head>\n\
<body>\n<p>{escaped}</p>\n</body>\n</html>\n"
    )
}


impl std::fmt::Debug for StatusDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Error { error } => write!(f, "Error({error})"),
            Self::Authenticated { .. } => write!(f, "Authenticated"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}
