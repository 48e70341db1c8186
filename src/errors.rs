// ABOUTME: Centralized error handling and error types for the agent OAuth server
// ABOUTME: Defines the error-kind taxonomy and HTTP response formatting used across all components
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Unified error handling.
//!
//! A single [`AppError`] type carries one of the error kinds spec'd for this
//! authorization server (RFC 6749 §5.2 / §4.1.2.1 error codes plus a couple of
//! coordinator-specific ones). It implements Axum's `IntoResponse` directly,
//! unlike the teacher's `warp`-era error type, since every route in this crate
//! is Axum-native.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

/// The error-kind strings returned in `{error, error_description}` bodies.
///
/// These are the exact wire values from spec.md §7 — callers must not see
/// Rust variant names, only these lowercase/underscore strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed or missing request parameters.
    InvalidRequest,
    /// Client (or admin) credential authentication failed.
    InvalidClient,
    /// Authorization code / refresh token / PKCE verification failed.
    InvalidGrant,
    /// `grant_type` value the token endpoint does not implement.
    UnsupportedGrantType,
    /// `response_type` value the authorize endpoint does not implement.
    UnsupportedResponseType,
    /// The authorization request's TTL has elapsed.
    RequestExpired,
    /// Referenced entity does not exist.
    NotFound,
    /// An invariant was violated; the caller did nothing wrong.
    ServerError,
}

impl ErrorCode {
    /// Wire value for the `error` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::RequestExpired => "request_expired",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
        }
    }

    /// `HTTP` status code associated with this error kind.
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::InvalidGrant | Self::UnsupportedGrantType
            | Self::UnsupportedResponseType | Self::RequestExpired => StatusCode::BAD_REQUEST,
            Self::InvalidClient => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error carrying a wire error kind and a human description.
#[derive(Debug, Error)]
#[error("{code}: {description}")]
pub struct AppError {
    code: ErrorCode,
    description: String,
}

impl AppError {
    /// Construct an error of the given kind with a human-readable description.
    pub fn new(code: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    /// `invalid_request` error.
    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, description)
    }

    /// `invalid_client` error.
    pub fn invalid_client(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidClient, description)
    }

    /// `invalid_grant` error.
    pub fn invalid_grant(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidGrant, description)
    }

    /// `unsupported_grant_type` error.
    pub fn unsupported_grant_type() -> Self {
        Self::new(ErrorCode::UnsupportedGrantType, "Grant type not supported")
    }

    /// `unsupported_response_type` error.
    pub fn unsupported_response_type() -> Self {
        Self::new(
            ErrorCode::UnsupportedResponseType,
            "Only the 'code' response_type is supported",
        )
    }

    /// `request_expired` error.
    pub fn request_expired() -> Self {
        Self::new(ErrorCode::RequestExpired, "Authorization request has expired")
    }

    /// `not_found` error.
    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, description)
    }

    /// `server_error` error. Details are logged; the description shown to callers is generic.
    pub fn server_error(description: impl Into<String>) -> Self {
        let description = description.into();
        tracing::error!(detail = %description, "server_error");
        Self::new(ErrorCode::ServerError, "An internal error occurred")
    }

    /// The wire error kind.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    error_description: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.code.http_status();
        let body = ErrorBody {
            error: self.code.as_str(),
            error_description: self.description,
        };
        (status, Json(body)).into_response()
    }
}

/// Convenience alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
