// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Trust Errors
//!
//! Single error taxonomy for the verification and token-trust engine.
//!
//! Startup failures ([`TrustError::KeyLoadFailure`], [`TrustError::InvalidTtl`])
//! are fatal and name the offending key or setting. Every other variant is
//! recovered per message by the application services and rendered as one
//! fixed reply string.

use std::path::PathBuf;

/// Errors produced by key loading, token handling and the verification flows.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error("unknown tenant: {0}")]
    UnknownTenant(String),

    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    #[error("token has expired")]
    Expired,

    #[error("token is missing required claims: {0}")]
    MissingClaims(String),

    #[error("sender {sender} does not match claimed mobile {claimed}")]
    PhoneMismatch { sender: String, claimed: String },

    #[error("identity is blacklisted: {0}")]
    Blacklisted(String),

    #[error("blacklist lookup failed: {0}")]
    BlacklistUnavailable(String),

    #[error("callback failed: {0}")]
    CallbackFailed(String),

    #[error("malformed command: {0}")]
    MalformedCommand(String),

    #[error("rate limit exceeded for {0}")]
    RateLimited(String),

    /// Startup-fatal: a key or tenant entry could not be loaded.
    #[error("failed to load key for {owner} from {path:?}: {reason}")]
    KeyLoadFailure {
        owner: String,
        path: PathBuf,
        reason: String,
    },

    /// Startup-fatal: a configured token lifetime cannot be signed exactly.
    #[error("invalid token ttl: {0}")]
    InvalidTtl(String),

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TrustError {
    pub fn key_load(owner: impl Into<String>, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::KeyLoadFailure {
            owner: owner.into(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the failures that abort startup rather than a single message.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::KeyLoadFailure { .. } | Self::InvalidTtl(_))
    }
}
