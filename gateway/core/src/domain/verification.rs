// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Reverse Verification Outcomes
//!
//! Domain model for the reverse-verification flow, where a user proves
//! ownership of a phone number by forwarding a tenant-issued token back
//! through the messaging channel.
//!
//! ## Flow
//!
//! ```text
//! Received
//!   └─ BlacklistChecked   ── blocked / lookup error ──▶ Rejected
//!   └─ TenantResolved     ── unknown app_name ───────▶ Rejected
//!   └─ SignatureVerified  ── bad sig / expired ──────▶ Rejected
//!   └─ PhoneMatched       ── mismatch, no devops ────▶ Rejected
//!   └─ CallbackDispatched ── network / non-2xx ──────▶ Rejected
//!   └─ Done
//! ```
//!
//! Every gate completes before the next one starts. Each terminal outcome maps
//! to exactly one reply on the originating channel.

use serde::{Deserialize, Serialize};

use crate::domain::error::TrustError;

/// Gates of the verification state machine, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStage {
    Received,
    BlacklistChecked,
    TenantResolved,
    SignatureVerified,
    PhoneMatched,
    CallbackDispatched,
    Done,
}

/// Why a verification attempt stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The blacklist collaborator itself failed. Fail closed.
    BlacklistUnavailable,
    Blacklisted,
    UnknownTenant,
    InvalidSignature,
    Expired,
    MissingClaims,
    PhoneMismatch,
    /// Signing the callback assertion failed.
    SigningFailed,
    CallbackFailed,
    /// A fault outside the verification gates.
    Internal,
}

impl RejectReason {
    /// Last gate passed before the rejection.
    pub fn stage(&self) -> VerificationStage {
        match self {
            Self::BlacklistUnavailable | Self::Blacklisted | Self::Internal => VerificationStage::Received,
            Self::UnknownTenant => VerificationStage::BlacklistChecked,
            Self::InvalidSignature | Self::Expired | Self::MissingClaims => VerificationStage::TenantResolved,
            Self::PhoneMismatch => VerificationStage::SignatureVerified,
            Self::SigningFailed | Self::CallbackFailed => VerificationStage::PhoneMatched,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlacklistUnavailable => "blacklist_unavailable",
            Self::Blacklisted => "blacklisted",
            Self::UnknownTenant => "unknown_tenant",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::MissingClaims => "missing_claims",
            Self::PhoneMismatch => "phone_mismatch",
            Self::SigningFailed => "signing_failed",
            Self::CallbackFailed => "callback_failed",
            Self::Internal => "internal",
        }
    }

    /// True when the gateway or a collaborator failed, rather than the sender
    /// or the token.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::BlacklistUnavailable | Self::SigningFailed | Self::CallbackFailed | Self::Internal
        )
    }
}

impl From<&TrustError> for RejectReason {
    fn from(err: &TrustError) -> Self {
        match err {
            TrustError::BlacklistUnavailable(_) => Self::BlacklistUnavailable,
            TrustError::Blacklisted(_) => Self::Blacklisted,
            TrustError::UnknownTenant(_) => Self::UnknownTenant,
            TrustError::InvalidSignature(_) => Self::InvalidSignature,
            TrustError::Expired => Self::Expired,
            TrustError::MissingClaims(_) => Self::MissingClaims,
            TrustError::PhoneMismatch { .. } => Self::PhoneMismatch,
            TrustError::Signing(_) => Self::SigningFailed,
            TrustError::CallbackFailed(_) => Self::CallbackFailed,
            TrustError::MalformedCommand(_)
            | TrustError::RateLimited(_)
            | TrustError::KeyLoadFailure { .. }
            | TrustError::InvalidTtl(_)
            | TrustError::Internal(_) => Self::Internal,
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified {
        tenant_id: String,
        challenge_id: String,
        /// Sender did not match the claimed mobile but is a devops identity.
        devops_override: bool,
    },
    Rejected(RejectReason),
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    pub fn stage(&self) -> VerificationStage {
        match self {
            Self::Verified { .. } => VerificationStage::Done,
            Self::Rejected(reason) => reason.stage(),
        }
    }
}

/// User-facing reply texts, one per terminal outcome class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMessages {
    #[serde(default = "default_success")]
    pub success: String,
    #[serde(default = "default_expired")]
    pub expired: String,
    #[serde(default = "default_phone_mismatch")]
    pub phone_mismatch: String,
    #[serde(default = "default_blacklisted")]
    pub blacklisted: String,
    #[serde(default = "default_error")]
    pub error: String,
}

impl VerificationMessages {
    pub fn reply_for(&self, outcome: &VerificationOutcome) -> &str {
        match outcome {
            VerificationOutcome::Verified { .. } => &self.success,
            VerificationOutcome::Rejected(reason) => match reason {
                RejectReason::Blacklisted => &self.blacklisted,
                RejectReason::InvalidSignature | RejectReason::Expired | RejectReason::MissingClaims => &self.expired,
                RejectReason::PhoneMismatch => &self.phone_mismatch,
                RejectReason::BlacklistUnavailable
                | RejectReason::UnknownTenant
                | RejectReason::SigningFailed
                | RejectReason::CallbackFailed
                | RejectReason::Internal => &self.error,
            },
        }
    }
}

impl Default for VerificationMessages {
    fn default() -> Self {
        Self {
            success: default_success(),
            expired: default_expired(),
            phone_mismatch: default_phone_mismatch(),
            blacklisted: default_blacklisted(),
            error: default_error(),
        }
    }
}

fn default_success() -> String {
    "✅ Verification successful! You can now return to the app.".to_string()
}

fn default_expired() -> String {
    "❌ Verification failed. The link may have expired. Please request a new one from the app.".to_string()
}

fn default_phone_mismatch() -> String {
    "❌ Verification failed. Please make sure you're sending from the same number you registered with.".to_string()
}

fn default_blacklisted() -> String {
    "🚫 This number has been blocked from verification.".to_string()
}

fn default_error() -> String {
    "⚠️ Something went wrong. Please try again in a moment.".to_string()
}
