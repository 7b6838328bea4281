// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod blacklist;
pub mod callback;
pub mod key_registry;
pub mod keys;
pub mod rate_limiter;
pub mod token;

pub use blacklist::InMemoryBlacklist;
pub use callback::HttpCallbackDispatcher;
pub use key_registry::KeyRegistry;
pub use rate_limiter::SlidingWindowRateLimiter;
