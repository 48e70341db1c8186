// ABOUTME: Cryptographic primitives for the agent OAuth server
// ABOUTME: Re-exports secure random generation, secret hashing, PKCE, and JWT helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Cryptographic building blocks, each grounded on a specific teacher module
//! (see `SPEC_FULL.md` §4.1).

pub mod jwt;
pub mod pkce;
pub mod random;
pub mod secrets;
