// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # EdDSA Login Token Issuer
//!
//! Signs the login assertion handed to the single-page app after an `AUTH`
//! handshake. The assertion binds the sender's phone number (`sub`) to the
//! client's ephemeral public key (`pubkey`) and its one-time `nonce`.

use std::path::Path;
use std::time::Duration;

use ed25519_dalek::{SigningKey, VerifyingKey};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::domain::claims::LoginClaims;
use crate::domain::error::TrustError;
use crate::domain::gateway_config::OAuthConfig;
use crate::domain::token::{ttl_seconds, BearerTokenIssuer, LoginBinding};
use crate::infrastructure::keys::{ed25519_encoding_key, ed25519_public_key_base64, load_ed25519_signing_key};

use super::{expires_at, unix_now};

const OWNER: &str = "login Ed25519 signing key";

pub struct EdDsaTokenIssuer {
    encoding_key: EncodingKey,
    verifying_key: VerifyingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    ttl_secs: i64,
}

impl EdDsaTokenIssuer {
    /// `ttl` must be a whole, non-zero number of seconds.
    pub fn new(
        signing_key: &SigningKey,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, TrustError> {
        Ok(Self {
            encoding_key: ed25519_encoding_key(signing_key),
            verifying_key: signing_key.verifying_key(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl,
            ttl_secs: ttl_seconds(ttl)?,
        })
    }

    /// Load a PKCS#8 PEM or raw 32-byte seed file.
    pub fn from_key_file(
        path: &Path,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, TrustError> {
        ttl_seconds(ttl)?;
        let signing_key = load_ed25519_signing_key(OWNER, path)?;
        Self::new(&signing_key, issuer, audience, ttl)
    }

    pub fn from_config(config: &OAuthConfig) -> Result<Self, TrustError> {
        let path = config
            .key_path
            .as_deref()
            .ok_or_else(|| TrustError::key_load(OWNER, "", "auth.oauth.key_path is not configured"))?;
        Self::from_key_file(path, config.issuer.clone(), config.audience.clone(), config.ttl)
    }

    pub fn issue(&self, subject: &str, nonce: &str, ephemeral_public_key: &str) -> Result<String, TrustError> {
        self.issue_bound(
            subject,
            LoginBinding {
                nonce: nonce.to_string(),
                ephemeral_public_key: ephemeral_public_key.to_string(),
            },
        )
    }

    /// Public half of the signing key, URL-safe base64 without padding.
    pub fn public_key_base64(&self) -> String {
        ed25519_public_key_base64(&self.verifying_key)
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl BearerTokenIssuer for EdDsaTokenIssuer {
    type Binding = LoginBinding;

    fn issue_bound(&self, subject: &str, binding: LoginBinding) -> Result<String, TrustError> {
        let iat = unix_now();
        let exp = expires_at(iat, self.ttl_secs)?;
        let claims = LoginClaims {
            sub: subject.to_string(),
            nonce: binding.nonce,
            pubkey: binding.ephemeral_public_key,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat,
            exp,
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| TrustError::Signing(e.to_string()))
    }

    fn issuer(&self) -> &str {
        &self.issuer
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for EdDsaTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdDsaTokenIssuer")
            .field("public_key", &self.public_key_base64())
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
