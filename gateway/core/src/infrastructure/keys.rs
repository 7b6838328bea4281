// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Key Material Loading
//!
//! Reads signing and verification keys from disk once, at startup, and turns
//! them into `jsonwebtoken` keys. Every failure is a
//! [`TrustError::KeyLoadFailure`] naming the key's owner and file.
//!
//! Accepted encodings:
//!
//! | Key | Encodings |
//! |---|---|
//! | RSA private (gateway) | PEM PKCS#1 `RSA PRIVATE KEY`, PEM PKCS#8 `PRIVATE KEY` |
//! | Ed25519 private (gateway) | PEM PKCS#8 `PRIVATE KEY`, raw 32-byte seed |
//! | Tenant public | PEM SPKI `PUBLIC KEY`, RSA or Ed25519 |

use std::path::Path;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ed25519_dalek::pkcs8::{DecodePrivateKey as _, DecodePublicKey as _};
use ed25519_dalek::{SigningKey, VerifyingKey, SECRET_KEY_LENGTH};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::pkcs1::DecodeRsaPrivateKey as _;
use rsa::pkcs8::{DecodePrivateKey as _, DecodePublicKey as _};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::domain::error::TrustError;
use crate::domain::tenant::TenantAlgorithm;

/// PKCS#8 v1 prefix for an Ed25519 private key; the 32-byte seed follows.
const ED25519_PKCS8_V1_PREFIX: [u8; 16] = [
    0x30, 0x2e, // SEQUENCE, 46 bytes
    0x02, 0x01, 0x00, // INTEGER version 0
    0x30, 0x05, // SEQUENCE, algorithm identifier
    0x06, 0x03, 0x2b, 0x65, 0x70, // OID 1.3.101.112 (Ed25519)
    0x04, 0x22, // OCTET STRING, 34 bytes
    0x04, 0x20, // OCTET STRING, 32 bytes (seed)
];

fn read_key_file(owner: &str, path: &Path) -> Result<Vec<u8>, TrustError> {
    std::fs::read(path).map_err(|e| TrustError::key_load(owner, path, format!("failed to read key file: {}", e)))
}

fn pem_text<'a>(owner: &str, path: &Path, data: &'a [u8]) -> Result<&'a str, TrustError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| TrustError::key_load(owner, path, "no PEM block found in key data"))?;
    if !text.contains("-----BEGIN ") {
        return Err(TrustError::key_load(owner, path, "no PEM block found in key data"));
    }
    Ok(text)
}

/// Load the gateway's RS256 signing key.
pub fn load_rsa_signing_key(owner: &str, path: &Path) -> Result<EncodingKey, TrustError> {
    let data = read_key_file(owner, path)?;
    rsa_signing_key_from_pem(owner, path, &data)
}

pub(crate) fn rsa_signing_key_from_pem(owner: &str, path: &Path, data: &[u8]) -> Result<EncodingKey, TrustError> {
    let text = pem_text(owner, path, data)?;

    if RsaPrivateKey::from_pkcs1_pem(text).is_err() {
        RsaPrivateKey::from_pkcs8_pem(text).map_err(|e| {
            TrustError::key_load(owner, path, format!("key is neither PKCS#1 nor PKCS#8 RSA: {}", e))
        })?;
    }

    EncodingKey::from_rsa_pem(data)
        .map_err(|e| TrustError::key_load(owner, path, format!("failed to parse RSA private key: {}", e)))
}

/// Load the gateway's Ed25519 signing key from a PKCS#8 PEM file or a raw seed file.
pub fn load_ed25519_signing_key(owner: &str, path: &Path) -> Result<SigningKey, TrustError> {
    let data = read_key_file(owner, path)?;

    if let Ok(text) = std::str::from_utf8(&data) {
        if text.contains("-----BEGIN ") {
            return SigningKey::from_pkcs8_pem(text).map_err(|e| {
                TrustError::key_load(owner, path, format!("failed to parse PKCS#8 Ed25519 key: {}", e))
            });
        }
    }

    let seed: [u8; SECRET_KEY_LENGTH] = data.as_slice().try_into().map_err(|_| {
        TrustError::key_load(
            owner,
            path,
            format!("key file is neither PEM-encoded nor a {}-byte raw seed", SECRET_KEY_LENGTH),
        )
    })?;
    Ok(SigningKey::from_bytes(&seed))
}

/// Wrap an Ed25519 key as a PKCS#8 v1 document for `jsonwebtoken`.
pub fn ed25519_encoding_key(signing_key: &SigningKey) -> EncodingKey {
    let mut der = Vec::with_capacity(ED25519_PKCS8_V1_PREFIX.len() + SECRET_KEY_LENGTH);
    der.extend_from_slice(&ED25519_PKCS8_V1_PREFIX);
    der.extend_from_slice(signing_key.as_bytes());
    EncodingKey::from_ed_der(&der)
}

/// Compact URL-safe, unpadded base64 form of an Ed25519 public key.
pub fn ed25519_public_key_base64(key: &VerifyingKey) -> String {
    URL_SAFE_NO_PAD.encode(key.as_bytes())
}

/// Load a tenant's verification key, requiring it to match `expected`.
pub fn load_public_key(owner: &str, path: &Path, expected: TenantAlgorithm) -> Result<DecodingKey, TrustError> {
    let data = read_key_file(owner, path)?;
    public_key_from_pem(owner, path, &data, expected)
}

pub(crate) fn public_key_from_pem(
    owner: &str,
    path: &Path,
    data: &[u8],
    expected: TenantAlgorithm,
) -> Result<DecodingKey, TrustError> {
    let text = pem_text(owner, path, data)?;

    match expected {
        TenantAlgorithm::Rs256 => {
            if let Err(e) = RsaPublicKey::from_public_key_pem(text) {
                let reason = if VerifyingKey::from_public_key_pem(text).is_ok() {
                    "key is Ed25519, expected RSA".to_string()
                } else {
                    format!("failed to parse RSA public key: {}", e)
                };
                return Err(TrustError::key_load(owner, path, reason));
            }
            DecodingKey::from_rsa_pem(data)
                .map_err(|e| TrustError::key_load(owner, path, format!("failed to parse RSA public key: {}", e)))
        }
        TenantAlgorithm::EdDsa => {
            let key = VerifyingKey::from_public_key_pem(text).map_err(|e| {
                let reason = if RsaPublicKey::from_public_key_pem(text).is_ok() {
                    "key is RSA, expected Ed25519".to_string()
                } else {
                    format!("failed to parse Ed25519 public key: {}", e)
                };
                TrustError::key_load(owner, path, reason)
            })?;
            DecodingKey::from_ed_components(&ed25519_public_key_base64(&key))
                .map_err(|e| TrustError::key_load(owner, path, format!("failed to build Ed25519 key: {}", e)))
        }
    }
}
