// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Token
//!
//! JWT issuance and inspection for the gateway.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** RS256 callback/agent issuer, EdDSA login issuer and the
//!   verifier for tenant-signed verification tokens

pub mod eddsa;
pub mod inspector;
pub mod rs256;

pub use eddsa::EdDsaTokenIssuer;
pub use inspector::VerificationTokenInspector;
pub use rs256::Rs256TokenIssuer;

use crate::domain::error::TrustError;

/// `iat + ttl_secs`, failing rather than wrapping.
pub(crate) fn expires_at(iat: i64, ttl_secs: i64) -> Result<i64, TrustError> {
    iat.checked_add(ttl_secs)
        .ok_or_else(|| TrustError::Signing(format!("expiry overflows for ttl of {}s", ttl_secs)))
}

/// Seconds since the Unix epoch.
pub(crate) fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
