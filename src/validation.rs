// ABOUTME: Syntactic validation for emails, URLs, identifiers, and challenge methods
// ABOUTME: Pure checks with no store access, shared by coordinator/admin/token_service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Validation, as specified in spec.md §4.3. URL checks follow
//! `client_registration.rs::validate_http_uri` (parse with `url::Url`,
//! reject fragments, require `https` except for loopback), tightened to
//! spec.md's exact-match-only redirect-URI rule.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("hardcoded regex is valid"));

#[allow(clippy::expect_used)]
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,}$").expect("hardcoded regex is valid"));

/// `<nonspace_at>@<nonspace_dot><nonspace>` (spec.md §4.3).
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Identifier format: `[A-Za-z0-9_-]`, length >= 3.
#[must_use]
pub fn is_valid_identifier(id: &str) -> bool {
    IDENTIFIER_RE.is_match(id)
}

/// Parse and validate a candidate redirect URI the way client registration
/// requires: absolute, no fragment, no wildcard host, `https` unless the
/// host is a loopback address.
fn parse_redirect_uri(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;
    if url.fragment().is_some() {
        return None;
    }
    if candidate.contains('*') {
        return None;
    }
    let host = url.host_str()?;
    let is_loopback = host == "localhost" || host == "127.0.0.1" || host == "::1";
    if url.scheme() != "https" && !is_loopback {
        return None;
    }
    Some(url)
}

/// Validate a redirect URI for client registration (must be a well-formed,
/// non-wildcard, https-or-loopback absolute URL).
#[must_use]
pub fn is_valid_redirect_uri_candidate(candidate: &str) -> bool {
    parse_redirect_uri(candidate).is_some()
}

/// Strict string-equality membership check against a client's registered
/// redirect URIs (spec.md §4.3: no prefix/path matching, no trailing-slash
/// normalization — unlike the teacher's looser "contains" check).
#[must_use]
pub fn redirect_uri_is_allowed(redirect_uri: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a == redirect_uri)
}

/// Challenge method must be exactly `S256` (OAuth 2.1 forbids `plain`).
#[must_use]
pub fn is_valid_challenge_method(method: &str) -> bool {
    method == crate::crypto::pkce::METHOD_S256
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn identifier_validation() {
        assert!(is_valid_identifier("agent_abc-123"));
        assert!(!is_valid_identifier("ab"));
        assert!(!is_valid_identifier("has spaces"));
    }

    #[test]
    fn redirect_uri_strict_match() {
        let allowed = vec!["https://example.com/callback".to_owned()];
        assert!(redirect_uri_is_allowed("https://example.com/callback", &allowed));
        assert!(!redirect_uri_is_allowed(
            "https://example.com/callback/",
            &allowed
        ));
        assert!(!redirect_uri_is_allowed(
            "https://example.com/callback?extra=1",
            &allowed
        ));
    }

    #[test]
    fn redirect_uri_candidate_rules() {
        assert!(is_valid_redirect_uri_candidate("https://example.com/cb"));
        assert!(is_valid_redirect_uri_candidate("http://localhost:3000/cb"));
        assert!(!is_valid_redirect_uri_candidate("http://example.com/cb"));
        assert!(!is_valid_redirect_uri_candidate("https://example.com/cb#frag"));
        assert!(!is_valid_redirect_uri_candidate("https://*.example.com/cb"));
    }

    #[test]
    fn challenge_method_must_be_s256() {
        assert!(is_valid_challenge_method("S256"));
        assert!(!is_valid_challenge_method("plain"));
    }
}
