// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Sliding Window Rate Limiter
//!
//! Per-identity request log over a trailing window. Buckets are created on
//! first use, pruned on every access and never persisted; a restart resets
//! all limits.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

pub const DEFAULT_MAX_REQUESTS: u32 = 5;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
pub struct SlidingWindowRateLimiter {
    buckets: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: u32,
    window: Duration,
}

impl SlidingWindowRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Admit and record one request for `identity`, or deny without recording.
    pub fn check(&self, identity: &str) -> bool {
        self.check_at(identity, Instant::now())
    }

    pub fn check_at(&self, identity: &str, now: Instant) -> bool {
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(identity.to_string()).or_default();
        Self::prune(bucket, now, self.window);

        if bucket.len() >= self.max_requests as usize {
            return false;
        }

        bucket.push_back(now);
        true
    }

    /// Requests still available to `identity` in the current window.
    pub fn remaining(&self, identity: &str) -> u32 {
        self.remaining_at(identity, Instant::now())
    }

    pub fn remaining_at(&self, identity: &str, now: Instant) -> u32 {
        let mut buckets = self.buckets.lock();
        let used = match buckets.get_mut(identity) {
            Some(bucket) => {
                Self::prune(bucket, now, self.window);
                bucket.len() as u32
            }
            None => 0,
        };
        self.max_requests.saturating_sub(used)
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // Timestamps are pushed in order, so expired ones sit at the front.
    fn prune(bucket: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(&oldest) = bucket.front() {
            if now.saturating_duration_since(oldest) >= window {
                bucket.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for SlidingWindowRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_admits_exactly_max_per_window() {
        let limiter = SlidingWindowRateLimiter::default();
        let start = Instant::now();

        for i in 0..5 {
            assert!(limiter.check_at("919876543210", start + Duration::from_secs(i)), "request {}", i);
        }
        assert!(!limiter.check_at("919876543210", start + Duration::from_secs(10)));
        assert_eq!(limiter.remaining_at("919876543210", start + Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_admits_again_after_window() {
        let limiter = SlidingWindowRateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("a", start));
        assert!(limiter.check_at("a", start + Duration::from_secs(30)));
        assert!(!limiter.check_at("a", start + Duration::from_secs(59)));

        // First entry ages out exactly at the window boundary
        assert!(limiter.check_at("a", start + Duration::from_secs(60)));
        assert!(!limiter.check_at("a", start + Duration::from_secs(61)));
        assert!(limiter.check_at("a", start + Duration::from_secs(90)));
    }

    #[test]
    fn test_denied_requests_are_not_recorded() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("a", start));
        for s in 1..50 {
            assert!(!limiter.check_at("a", start + Duration::from_secs(s)));
        }
        assert!(limiter.check_at("a", start + Duration::from_secs(60)));
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
        assert_eq!(limiter.remaining("c"), 1);
    }

    #[test]
    fn test_concurrent_checks_never_exceed_max() {
        let limiter = Arc::new(SlidingWindowRateLimiter::new(5, Duration::from_secs(3600)));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || (0..10).filter(|_| limiter.check("shared")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 5);
    }
}
