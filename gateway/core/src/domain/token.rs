// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Bearer Token Issuance
//!
//! The gateway signs assertions for two unrelated purposes: RS256 callback and
//! agent tokens, and EdDSA login tokens. Each purpose has its own issuer with
//! its own key material and TTL policy. [`BearerTokenIssuer`] is the shared
//! capability: produce a bearer token for a subject, plus whatever binding
//! that purpose requires.

use std::time::Duration;

use crate::domain::error::TrustError;

/// Whole seconds in `ttl`, as signed into `exp - iat`.
///
/// Zero, fractional and out-of-range lifetimes are rejected because the
/// issued token could not carry them exactly.
pub fn ttl_seconds(ttl: Duration) -> Result<i64, TrustError> {
    if ttl.is_zero() {
        return Err(TrustError::InvalidTtl("must be greater than zero".to_string()));
    }
    if ttl.subsec_nanos() != 0 {
        return Err(TrustError::InvalidTtl(format!("{:?} is not a whole number of seconds", ttl)));
    }
    i64::try_from(ttl.as_secs()).map_err(|_| TrustError::InvalidTtl(format!("{:?} is too large", ttl)))
}

pub trait BearerTokenIssuer: Send + Sync {
    /// Purpose-specific claims bound into the token besides the subject.
    type Binding;

    fn issue_bound(&self, subject: &str, binding: Self::Binding) -> Result<String, TrustError>;

    /// Value of the `iss` claim.
    fn issuer(&self) -> &str;

    /// Exact distance between `iat` and `exp` on every issued token.
    fn ttl(&self) -> Duration;
}

/// Binding for RS256 assertions. Both fields empty yields an agent token that
/// carries the issuer's configured audience.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudienceBinding {
    pub audience: Option<String>,
    pub challenge_id: Option<String>,
}

/// Binding for EdDSA login assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginBinding {
    pub nonce: String,
    pub ephemeral_public_key: String,
}
