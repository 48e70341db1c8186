// ABOUTME: Structured logging initialization for the agent OAuth server
// ABOUTME: Wires tracing-subscriber with an env-filter and a stable human/JSON format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! `tracing`/`tracing-subscriber` setup, following the teacher's `logging`
//! module: an `EnvFilter` seeded from configuration, falling back to
//! `RUST_LOG` when set, with a compact formatter for local/dev use.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global `tracing` subscriber.
///
/// `default_level` is used to build the `EnvFilter` when `RUST_LOG` is unset;
/// `RUST_LOG`, when present, always takes precedence.
///
/// # Panics
/// Panics if a global subscriber has already been installed.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_owned()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_level(true))
        .init();
}

/// Initialize a JSON-formatted subscriber, for production deployments where
/// logs are shipped to a collector rather than read from a terminal.
///
/// # Panics
/// Panics if a global subscriber has already been installed.
pub fn init_json(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_owned()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_target(true).with_level(true))
        .init();
}
