// ABOUTME: Per-IP sliding-window rate limiting for authentication-sensitive endpoints
// ABOUTME: Supplemental defense-in-depth alongside the coordinator's one-shot failure policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Rate limiting, grounded on `oauth2_server/rate_limiting.rs::OAuth2RateLimiter`:
//! a `DashMap<IpAddr, (count, window_start)>` sliding window, guarding
//! `/authorize`, `/api/agent/authenticate`, and `/token` the same way the
//! teacher guards its own `/authorize` and `/register` endpoints. This adds
//! a second, independent layer to spec.md §9's one-shot anti-guessing
//! policy on agent authentication.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// A sliding-window per-IP limiter: at most `max_requests` within `window`.
pub struct RateLimiter {
    hits: DashMap<IpAddr, (u32, Instant)>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            hits: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Record a request from `ip` and report whether it is still within the
    /// allowed rate. Resets the window once it has elapsed.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut entry = self.hits.entry(ip).or_insert((0, now));

        if now.duration_since(entry.1) > self.window {
            *entry = (1, now);
            return true;
        }

        entry.0 += 1;
        entry.0 <= self.max_requests
    }

    /// Drop tracking entries whose window has elapsed, bounding memory use.
    pub fn sweep(&self) {
        let now = Instant::now();
        let window = self.window;
        self.hits.retain(|_, (_, started)| now.duration_since(*started) <= window);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn allows_up_to_max_requests_then_blocks() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let ip: IpAddr = "127.0.0.1".parse().expect("ip");
        assert!(limiter.check(ip));
        assert!(limiter.check(ip));
        assert!(limiter.check(ip));
        assert!(!limiter.check(ip));
    }

    #[test]
    fn tracks_distinct_ips_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let a: IpAddr = "127.0.0.1".parse().expect("ip");
        let b: IpAddr = "127.0.0.2".parse().expect("ip");
        assert!(limiter.check(a));
        assert!(limiter.check(b));
        assert!(!limiter.check(a));
    }
}
