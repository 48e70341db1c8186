// ABOUTME: Periodic background task that removes expired store entries
// ABOUTME: Runs on a tokio::time::interval for the lifetime of the process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Sweeper, following the teacher's pattern of scheduling periodic
//! background work with `tokio::spawn` over a `tokio::time::interval`
//! (spec.md §4.2: every 5 minutes by default).

use std::sync::Arc;
use std::time::Duration;

use crate::store::Store;

/// Spawn the sweeper loop. Returns its `JoinHandle` so callers may abort it
/// on shutdown.
pub fn spawn(store: Arc<Store>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick fires immediately; skip it so we don't sweep a cold store.
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = store.sweep_expired(chrono::Utc::now());
            if removed > 0 {
                tracing::debug!(removed, "sweeper removed expired store entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::store::models::AuthRequestStatus;

    #[tokio::test(start_paused = true)]
    async fn sweeper_removes_expired_entries_over_time() {
        let store = Arc::new(Store::new());
        let now = chrono::Utc::now();
        store.insert_auth_request(crate::store::models::AuthRequest {
            request_id: "req_1".to_owned(),
            client_id: "client_1".to_owned(),
            redirect_uri: "https://example.com/cb".to_owned(),
            state: "xyz".to_owned(),
            code_challenge: "challenge".to_owned(),
            code_challenge_method: "S256".to_owned(),
            scope: "openid".to_owned(),
            status: AuthRequestStatus::Pending,
            code: None,
            agent_id: None,
            model: None,
            error: None,
            created_at: now,
            expires_at: now - chrono::Duration::seconds(1),
        });

        let handle = spawn(Arc::clone(&store), Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(25)).await;
        tokio::task::yield_now().await;

        assert!(store.get_auth_request("req_1").is_none());
        handle.abort();
    }
}
