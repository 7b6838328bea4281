// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Tenant Keys
//!
//! A tenant is a third-party application registered with its own verification
//! public key and a statically configured callback base URL.
//!
//! ## Invariants
//!
//! - A [`TenantKey`] is immutable once loaded.
//! - The callback destination is configuration-owned. Nothing read from an
//!   inbound token can change where [`TenantKey::callback_url`] points.

use jsonwebtoken::{Algorithm, DecodingKey};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::error::TrustError;

/// Signature scheme a tenant signs its verification tokens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TenantAlgorithm {
    #[default]
    #[serde(rename = "RS256")]
    Rs256,
    #[serde(rename = "EdDSA")]
    EdDsa,
}

impl TenantAlgorithm {
    pub fn jwt_algorithm(self) -> Algorithm {
        match self {
            Self::Rs256 => Algorithm::RS256,
            Self::EdDsa => Algorithm::EdDSA,
        }
    }
}

impl std::fmt::Display for TenantAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rs256 => write!(f, "RS256"),
            Self::EdDsa => write!(f, "EdDSA"),
        }
    }
}

/// One registered tenant application.
#[derive(Clone)]
pub struct TenantKey {
    tenant_id: String,
    algorithm: TenantAlgorithm,
    decoding_key: DecodingKey,
    callback_base_url: Url,
}

impl TenantKey {
    pub fn new(
        tenant_id: impl Into<String>,
        algorithm: TenantAlgorithm,
        decoding_key: DecodingKey,
        callback_base_url: Url,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            algorithm,
            decoding_key,
            callback_base_url,
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn algorithm(&self) -> TenantAlgorithm {
        self.algorithm
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn callback_base_url(&self) -> &Url {
        &self.callback_base_url
    }

    /// Build `<callback_base_url>/callback?challenge_id=<challenge_id>`.
    ///
    /// The challenge id is query-encoded, so it cannot alter the host or path.
    pub fn callback_url(&self, challenge_id: &str) -> Result<Url, TrustError> {
        let mut url = self.callback_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TrustError::Internal(format!(
                    "callback base URL for tenant {} cannot carry a path",
                    self.tenant_id
                ))
            })?
            .pop_if_empty()
            .push("callback");
        url.set_query(None);
        url.query_pairs_mut().append_pair("challenge_id", challenge_id);
        Ok(url)
    }
}

impl std::fmt::Debug for TenantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantKey")
            .field("tenant_id", &self.tenant_id)
            .field("algorithm", &self.algorithm)
            .field("callback_base_url", &self.callback_base_url.as_str())
            .finish()
    }
}

/// Parse and vet a configured callback base URL. Only http and https are accepted.
pub fn parse_callback_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("invalid callback_base_url {:?}: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("callback_base_url scheme must be http or https, got {:?}", other)),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("callback_base_url {:?} has no host", raw));
    }
    if url.cannot_be_a_base() {
        return Err(format!("callback_base_url {:?} cannot be a base URL", raw));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(base: &str) -> TenantKey {
        TenantKey::new(
            "test-app",
            TenantAlgorithm::Rs256,
            DecodingKey::from_secret(b"unused"),
            parse_callback_base_url(base).unwrap(),
        )
    }

    #[test]
    fn test_callback_url_appends_path_and_query() {
        let url = tenant("https://app.example.com").callback_url("ch-123").unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/callback?challenge_id=ch-123");
    }

    #[test]
    fn test_callback_url_keeps_base_path_and_trailing_slash() {
        let url = tenant("https://app.example.com/api/v1/").callback_url("abc").unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/api/v1/callback?challenge_id=abc");
    }

    #[test]
    fn test_callback_url_encodes_hostile_challenge_id() {
        let url = tenant("https://app.example.com").callback_url("x&evil=1#@attacker.test/").unwrap();
        assert_eq!(url.host_str(), Some("app.example.com"));
        assert_eq!(url.path(), "/callback");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("challenge_id".to_string(), "x&evil=1#@attacker.test/".to_string())]);
    }

    #[test]
    fn test_parse_callback_base_url_rejects_other_schemes() {
        assert!(parse_callback_base_url("file:///etc/passwd").is_err());
        assert!(parse_callback_base_url("ftp://example.com").is_err());
        assert!(parse_callback_base_url("not a url").is_err());
        assert!(parse_callback_base_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_algorithm_serde_names() {
        let alg: TenantAlgorithm = serde_yaml::from_str("EdDSA").unwrap();
        assert_eq!(alg, TenantAlgorithm::EdDsa);
        assert_eq!(TenantAlgorithm::default().jwt_algorithm(), Algorithm::RS256);
    }
}
