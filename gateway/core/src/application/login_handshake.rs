// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Login Handshake - Application Layer
//!
//! Handles `AUTH <public_key> <nonce>` messages. The client app generates an
//! ephemeral Ed25519 key pair and a nonce, the user sends them from their
//! phone, and the gateway replies with a deep link carrying an EdDSA assertion
//! that binds the sender's number to that key and nonce.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Parses, rate-limits and answers login commands

use std::sync::{Arc, OnceLock};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use regex::Regex;
use tracing::{info, warn};

use crate::domain::error::TrustError;
use crate::domain::phone::normalize_phone;
use crate::domain::token::{BearerTokenIssuer, LoginBinding};
use crate::infrastructure::rate_limiter::SlidingWindowRateLimiter;

pub type LoginTokenIssuer = dyn BearerTokenIssuer<Binding = LoginBinding>;

const EPHEMERAL_KEY_BYTES: usize = 32;

pub const INVALID_FORMAT: &str = "Invalid AUTH command format.\nExpected: AUTH <public_key> <nonce>";
pub const INVALID_ENCODING: &str = "Invalid public key: not valid base64url encoding.";
pub const NO_SENDER_NUMBER: &str = "Login requires a sender with a phone number.";
pub const RATE_LIMITED_REPLY: &str = "⏳ Too many AUTH requests. Please try again later.";

fn command_pattern() -> &'static Regex {
    static AUTH_RE: OnceLock<Regex> = OnceLock::new();
    AUTH_RE.get_or_init(|| {
        Regex::new(r"^(?i:AUTH)\s+([A-Za-z0-9_-]{43}=?)\s+([A-Za-z0-9_-]{16,})$").expect("hardcoded regex")
    })
}

pub struct LoginHandshakeHandler {
    token_issuer: Arc<LoginTokenIssuer>,
    spa_url: String,
    limiter: SlidingWindowRateLimiter,
}

impl LoginHandshakeHandler {
    pub fn new(token_issuer: Arc<LoginTokenIssuer>, spa_url: &str, limiter: SlidingWindowRateLimiter) -> Self {
        Self {
            token_issuer,
            spa_url: spa_url.trim_end_matches('/').to_string(),
            limiter,
        }
    }

    /// True when the trimmed text begins with the `AUTH` keyword, any case.
    pub fn is_command(text: &str) -> bool {
        let text = text.trim();
        match text.get(..4) {
            Some(keyword) if keyword.eq_ignore_ascii_case("AUTH") => {
                text[4..].chars().next().is_none_or(char::is_whitespace)
            }
            _ => false,
        }
    }

    /// Answer one `AUTH` command.
    ///
    /// Bad input and throttling produce a user-facing reply in `Ok`. `Err` is
    /// reserved for signing faults.
    pub fn handle(&self, sender: &str, text: &str) -> Result<String, TrustError> {
        match self.evaluate(sender, text) {
            Err(e) => match Self::rejection_reply(&e) {
                Some(reply) => Ok(reply),
                None => Err(e),
            },
            link => link,
        }
    }

    /// Parse, throttle and sign one `AUTH` command, returning the deep link.
    ///
    /// Bad input fails with [`TrustError::MalformedCommand`] and throttling
    /// with [`TrustError::RateLimited`].
    pub fn evaluate(&self, sender: &str, text: &str) -> Result<String, TrustError> {
        let captures = command_pattern()
            .captures(text.trim())
            .ok_or_else(|| TrustError::MalformedCommand(INVALID_FORMAT.to_string()))?;
        // Padding is accepted on input but never signed
        let public_key = captures[1].trim_end_matches('=');
        let nonce = &captures[2];

        let decoded = URL_SAFE_NO_PAD
            .decode(public_key)
            .map_err(|_| TrustError::MalformedCommand(INVALID_ENCODING.to_string()))?;
        if decoded.len() != EPHEMERAL_KEY_BYTES {
            return Err(TrustError::MalformedCommand(format!(
                "Invalid public key: expected {} bytes, got {}.",
                EPHEMERAL_KEY_BYTES,
                decoded.len()
            )));
        }

        let phone = normalize_phone(sender);
        if phone.is_empty() {
            return Err(TrustError::MalformedCommand(NO_SENDER_NUMBER.to_string()));
        }
        if !self.limiter.check(&phone) {
            warn!(phone = %phone, "AUTH rate limit exceeded");
            return Err(TrustError::RateLimited(phone));
        }

        let token = self.token_issuer.issue_bound(
            &phone,
            LoginBinding {
                nonce: nonce.to_string(),
                ephemeral_public_key: public_key.to_string(),
            },
        )?;

        info!(phone = %phone, "Login deep link issued");
        Ok(format!(
            "Click here to complete login:\n{}/auth#token={}&nonce={}",
            self.spa_url, token, nonce
        ))
    }

    /// Reply for a rejected command, or `None` for a gateway fault.
    pub fn rejection_reply(err: &TrustError) -> Option<String> {
        match err {
            TrustError::MalformedCommand(detail) => Some(format!("❌ {}", detail)),
            TrustError::RateLimited(_) => Some(RATE_LIMITED_REPLY.to_string()),
            _ => None,
        }
    }

    pub fn spa_url(&self) -> &str {
        &self.spa_url
    }
}
