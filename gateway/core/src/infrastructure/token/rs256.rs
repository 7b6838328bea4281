// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # RS256 Token Issuer
//!
//! Mints the gateway's RS256 bearer assertions:
//!
//! - agent tokens for the backend, audience fixed by configuration;
//! - verification callbacks into a tenant, audience = tenant id and bound to
//!   the tenant's `challenge_id`.
//!
//! All of them carry `channel = "whatsapp"` and expire exactly `ttl` after
//! issuance.

use std::path::Path;
use std::time::Duration;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::domain::claims::{GatewayClaims, CHANNEL};
use crate::domain::error::TrustError;
use crate::domain::gateway_config::JwtConfig;
use crate::domain::token::{ttl_seconds, AudienceBinding, BearerTokenIssuer};
use crate::infrastructure::keys::{load_rsa_signing_key, rsa_signing_key_from_pem};

use super::{expires_at, unix_now};

const OWNER: &str = "gateway RS256 signing key";

pub struct Rs256TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    ttl_secs: i64,
}

impl Rs256TokenIssuer {
    /// Load the private key from `path`. An empty `audience` omits `aud` on agent tokens.
    ///
    /// `ttl` must be a whole, non-zero number of seconds.
    pub fn from_key_file(
        path: &Path,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, TrustError> {
        let ttl_secs = ttl_seconds(ttl)?;
        let encoding_key = load_rsa_signing_key(OWNER, path)?;
        Ok(Self::with_key(encoding_key, issuer.into(), audience.into(), ttl, ttl_secs))
    }

    pub fn from_pem(
        pem: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, TrustError> {
        let ttl_secs = ttl_seconds(ttl)?;
        let encoding_key = rsa_signing_key_from_pem(OWNER, Path::new("<inline>"), pem)?;
        Ok(Self::with_key(encoding_key, issuer.into(), audience.into(), ttl, ttl_secs))
    }

    /// Build from the `auth.jwt` section. Fails when no key path is configured.
    pub fn from_config(config: &JwtConfig) -> Result<Self, TrustError> {
        let path = config.private_key_path.as_deref().ok_or_else(|| {
            TrustError::key_load(OWNER, "", "auth.jwt.private_key_path is not configured")
        })?;
        Self::from_key_file(path, config.issuer.clone(), config.audience.clone(), config.ttl)
    }

    fn with_key(encoding_key: EncodingKey, issuer: String, audience: String, ttl: Duration, ttl_secs: i64) -> Self {
        Self {
            encoding_key,
            issuer,
            audience,
            ttl,
            ttl_secs,
        }
    }

    /// Agent bearer token with the configured audience.
    pub fn issue(&self, subject: &str) -> Result<String, TrustError> {
        self.issue_bound(subject, AudienceBinding::default())
    }

    pub fn issue_with_audience(&self, subject: &str, audience: &str) -> Result<String, TrustError> {
        self.issue_bound(
            subject,
            AudienceBinding {
                audience: Some(audience.to_string()),
                challenge_id: None,
            },
        )
    }

    /// Verification callback assertion bound to a tenant challenge.
    pub fn issue_callback(&self, subject: &str, audience: &str, challenge_id: &str) -> Result<String, TrustError> {
        self.issue_bound(
            subject,
            AudienceBinding {
                audience: Some(audience.to_string()),
                challenge_id: Some(challenge_id.to_string()),
            },
        )
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }
}

impl BearerTokenIssuer for Rs256TokenIssuer {
    type Binding = AudienceBinding;

    fn issue_bound(&self, subject: &str, binding: AudienceBinding) -> Result<String, TrustError> {
        let iat = unix_now();
        let exp = expires_at(iat, self.ttl_secs)?;
        let audience = binding
            .audience
            .or_else(|| (!self.audience.is_empty()).then(|| self.audience.clone()));

        let claims = GatewayClaims {
            user_id: subject.to_string(),
            channel: CHANNEL.to_string(),
            challenge_id: binding.challenge_id,
            iss: self.issuer.clone(),
            aud: audience,
            iat,
            exp,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| TrustError::Signing(e.to_string()))
    }

    fn issuer(&self) -> &str {
        &self.issuer
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for Rs256TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256TokenIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
