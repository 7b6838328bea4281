// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Gateway Factory - Application Layer
//!
//! Builds the engine from a [`GatewayConfig`]. All keys are loaded here, once;
//! any unreadable or mismatched key aborts construction with a
//! [`TrustError::KeyLoadFailure`] naming it.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Wires concrete infrastructure into the application services

use std::sync::Arc;

use tracing::info;

use crate::application::login_handshake::LoginHandshakeHandler;
use crate::application::message_router::MessageRouter;
use crate::application::verification_service::VerificationOrchestrator;
use crate::domain::callback::CallbackDispatcher;
use crate::domain::error::TrustError;
use crate::domain::gateway_config::GatewayConfig;
use crate::infrastructure::blacklist::InMemoryBlacklist;
use crate::infrastructure::callback::HttpCallbackDispatcher;
use crate::infrastructure::key_registry::KeyRegistry;
use crate::infrastructure::rate_limiter::SlidingWindowRateLimiter;
use crate::infrastructure::token::{EdDsaTokenIssuer, Rs256TokenIssuer};

/// Fully wired engine.
pub struct Gateway {
    pub router: MessageRouter,
    pub keys: Arc<KeyRegistry>,
    /// Present when `auth.jwt.private_key_path` is set.
    pub agent_issuer: Option<Arc<Rs256TokenIssuer>>,
    /// Present when the login handshake is enabled.
    pub login_issuer: Option<Arc<EdDsaTokenIssuer>>,
    pub blacklist: Arc<InMemoryBlacklist>,
}

/// Build the engine with the HTTP callback dispatcher.
pub fn create_gateway(config: &GatewayConfig) -> Result<Gateway, TrustError> {
    let dispatcher = Arc::new(HttpCallbackDispatcher::new(config.verification.callback_timeout)?);
    create_gateway_with_dispatcher(config, dispatcher)
}

pub fn create_gateway_with_dispatcher(
    config: &GatewayConfig,
    dispatcher: Arc<dyn CallbackDispatcher>,
) -> Result<Gateway, TrustError> {
    let agent_issuer = match config.auth.jwt.private_key_path {
        Some(_) => Some(Arc::new(Rs256TokenIssuer::from_config(&config.auth.jwt)?)),
        None => None,
    };

    let blacklist = Arc::new(InMemoryBlacklist::with_numbers(&config.verification.blacklisted_numbers));

    let (keys, verification) = if config.verification.enabled {
        let issuer = agent_issuer.clone().ok_or_else(|| {
            TrustError::key_load(
                "gateway RS256 signing key",
                "",
                "verification requires auth.jwt.private_key_path",
            )
        })?;
        let keys = Arc::new(KeyRegistry::load(&config.verification.apps)?);
        let orchestrator = VerificationOrchestrator::new(keys.clone(), issuer, dispatcher, &config.verification)
            .with_blacklist(blacklist.clone());
        info!(
            apps = keys.len(),
            devops_numbers = config.verification.devops_numbers.len(),
            blacklisted_numbers = config.verification.blacklisted_numbers.len(),
            "Reverse verification enabled"
        );
        (keys, Some(Arc::new(orchestrator)))
    } else {
        (Arc::new(KeyRegistry::default()), None)
    };

    let oauth = &config.auth.oauth;
    let (login_issuer, login) = if oauth.enabled {
        let issuer = Arc::new(EdDsaTokenIssuer::from_config(oauth)?);
        let limiter = SlidingWindowRateLimiter::new(oauth.rate_limit, oauth.rate_window);
        let handler = LoginHandshakeHandler::new(issuer.clone(), &oauth.spa_url, limiter);
        info!(
            spa_url = %handler.spa_url(),
            rate_limit = oauth.rate_limit,
            public_key = %issuer.public_key_base64(),
            "Login handshake enabled"
        );
        (Some(issuer), Some(Arc::new(handler)))
    } else {
        (None, None)
    };

    Ok(Gateway {
        router: MessageRouter::new(verification, login),
        keys,
        agent_issuer,
        login_issuer,
        blacklist,
    })
}
