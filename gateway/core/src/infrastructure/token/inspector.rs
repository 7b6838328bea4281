// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Verification Token Inspector
//!
//! Two entry points with different trust levels:
//!
//! - [`VerificationTokenInspector::classify`] peeks at an inbound message and
//!   decides whether it is shaped like a verification token. No signature
//!   check. The result only picks which tenant key to try.
//! - [`VerificationTokenInspector::verify`] checks the token against one
//!   tenant's key and is the only producer of [`VerifiedAssertion`].

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Validation};

use crate::domain::claims::{UnverifiedCandidate, VerificationClaims, VerifiedAssertion};
use crate::domain::error::TrustError;
use crate::domain::tenant::TenantKey;

use super::unix_now;

/// Every JWT with a JSON header starts with this prefix.
const JWT_PREFIX: &str = "eyJ";

#[derive(Debug, Default, Clone, Copy)]
pub struct VerificationTokenInspector;

impl VerificationTokenInspector {
    pub fn new() -> Self {
        Self
    }

    /// Decode the payload without verifying it. Returns `None` unless the
    /// message is a three-segment JWT with non-empty `mobile`, `app_name` and
    /// `challenge_id`.
    pub fn classify(&self, raw: &str) -> Option<UnverifiedCandidate> {
        let text = raw.trim();
        if !text.starts_with(JWT_PREFIX) {
            return None;
        }

        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
        let claims: VerificationClaims = serde_json::from_slice(&payload).ok()?;
        if !claims.missing_fields().is_empty() {
            return None;
        }

        Some(UnverifiedCandidate::from_claims(claims))
    }

    /// Verify `raw` against `tenant`'s key.
    ///
    /// The header algorithm must equal the tenant's pinned algorithm. `exp` is
    /// required and must lie strictly in the future, with no leeway.
    pub fn verify(&self, raw: &str, tenant: &TenantKey) -> Result<VerifiedAssertion, TrustError> {
        let text = raw.trim();
        let expected = tenant.algorithm().jwt_algorithm();

        let header = decode_header(text).map_err(|e| TrustError::InvalidSignature(format!("malformed header: {}", e)))?;
        if header.alg != expected {
            return Err(TrustError::InvalidSignature(format!(
                "unexpected signing method {:?}, tenant {} uses {}",
                header.alg,
                tenant.tenant_id(),
                tenant.algorithm()
            )));
        }

        let mut validation = Validation::new(expected);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<VerificationClaims>(text, tenant.decoding_key(), &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TrustError::Expired,
            ErrorKind::MissingRequiredClaim(claim) => TrustError::MissingClaims(claim.clone()),
            ErrorKind::Json(_) => TrustError::MissingClaims("malformed claims".to_string()),
            _ => TrustError::InvalidSignature(e.to_string()),
        })?;
        let claims = data.claims;

        let expires_at = claims
            .exp
            .ok_or_else(|| TrustError::MissingClaims("exp".to_string()))?;
        if expires_at <= unix_now() {
            return Err(TrustError::Expired);
        }

        let missing = claims.missing_fields();
        if !missing.is_empty() {
            return Err(TrustError::MissingClaims(missing.join(", ")));
        }

        Ok(VerifiedAssertion::new(claims, expires_at))
    }
}
