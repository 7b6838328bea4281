// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Assertion Claims
//!
//! JWT payloads handled by the gateway, inbound and outbound.
//!
//! Inbound verification tokens exist at two trust levels, modelled as two types:
//!
//! - [`UnverifiedCandidate`]: the payload was decoded without checking the
//!   signature. Good for routing a message, never for authorising anything.
//! - [`VerifiedAssertion`]: signature, algorithm, expiry and business fields
//!   were checked against the tenant's registered key. Only
//!   [`crate::infrastructure::token::VerificationTokenInspector::verify`]
//!   can construct one.

use serde::{Deserialize, Serialize};

/// Fixed `channel` claim embedded in every gateway-signed RS256 assertion.
pub const CHANNEL: &str = "whatsapp";

/// Raw claims of a tenant-signed verification token.
///
/// A `callback_url` field carried by older token shapes is not modelled here
/// and is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct VerificationClaims {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub challenge_id: String,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl VerificationClaims {
    /// Names of the business fields that are empty, in claim order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.mobile.is_empty() {
            missing.push("mobile");
        }
        if self.app_name.is_empty() {
            missing.push("app_name");
        }
        if self.challenge_id.is_empty() {
            missing.push("challenge_id");
        }
        missing
    }
}

/// A message that looks like a verification token. Unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedCandidate {
    mobile: String,
    app_name: String,
    challenge_id: String,
}

impl UnverifiedCandidate {
    pub(crate) fn from_claims(claims: VerificationClaims) -> Self {
        Self {
            mobile: claims.mobile,
            app_name: claims.app_name,
            challenge_id: claims.challenge_id,
        }
    }

    /// Claimed tenant. Only used to pick which key to verify against.
    pub fn claimed_app_name(&self) -> &str {
        &self.app_name
    }

    pub fn claimed_mobile(&self) -> &str {
        &self.mobile
    }

    pub fn claimed_challenge_id(&self) -> &str {
        &self.challenge_id
    }
}

/// A verification token whose signature and claims were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAssertion {
    mobile: String,
    app_name: String,
    challenge_id: String,
    issued_at: Option<i64>,
    expires_at: i64,
}

impl VerifiedAssertion {
    pub(crate) fn new(claims: VerificationClaims, expires_at: i64) -> Self {
        Self {
            mobile: claims.mobile,
            app_name: claims.app_name,
            challenge_id: claims.challenge_id,
            issued_at: claims.iat,
            expires_at,
        }
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn challenge_id(&self) -> &str {
        &self.challenge_id
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
}

/// RS256 bearer assertion for the backend agent and for tenant callbacks.
///
/// `challenge_id` is only present on callbacks, where it binds the assertion to
/// the challenge the tenant issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayClaims {
    pub user_id: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_id: Option<String>,
    pub iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// EdDSA login assertion binding a phone number to a client ephemeral key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginClaims {
    pub sub: String,
    pub nonce: String,
    pub pubkey: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}
