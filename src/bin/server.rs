// ABOUTME: Process entry point for the agent OAuth authorization server
// ABOUTME: Wires config, store, sweeper, and HTTP routes together and serves them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

use std::time::Duration;

use agent_oauth_server::{config::ServerConfig, constants, logging, routes, store::sweeper, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    logging::init(&config.log_level);

    tracing::info!(port = config.listen_port, issuer = %config.issuer, "starting agent OAuth authorization server");

    let state = AppState::new(config);
    let listen_port = state.config.listen_port;

    let sweep_period = Duration::from_secs(constants::ttl::SWEEP_INTERVAL_SECS);
    let sweeper_handle = sweeper::spawn(std::sync::Arc::clone(&state.store), sweep_period);
    let rate_limiter_handle = spawn_rate_limiter_sweeper(std::sync::Arc::clone(&state.rate_limiter), sweep_period);

    let router = routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", listen_port)).await?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    let result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    sweeper_handle.abort();
    rate_limiter_handle.abort();
    result.map_err(Into::into)
}

/// Periodically drops stale `rate_limit::RateLimiter` entries, mirroring
/// `store::sweeper`'s TTL-sweep pattern for the unrelated token/request store.
fn spawn_rate_limiter_sweeper(
    limiter: std::sync::Arc<agent_oauth_server::rate_limit::RateLimiter>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            limiter.sweep();
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => tracing::error!(%err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
