// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Verification Service - Application Layer
//!
//! Drives one forwarded verification token from receipt to a single reply:
//! blacklist gate, tenant resolution, signature check, phone match, signed
//! callback into the tenant.
//!
//! The callback destination always comes from the tenant's registered
//! `callback_base_url`. The token's claims only pick the tenant and supply the
//! `challenge_id` query value.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates the reverse-verification state machine

use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::domain::blacklist::BlacklistChecker;
use crate::domain::callback::CallbackDispatcher;
use crate::domain::error::TrustError;
use crate::domain::gateway_config::VerificationConfig;
use crate::domain::phone::normalize_phone;
use crate::domain::token::{AudienceBinding, BearerTokenIssuer};
use crate::domain::verification::{RejectReason, VerificationMessages, VerificationOutcome};
use crate::infrastructure::key_registry::KeyRegistry;
use crate::infrastructure::token::VerificationTokenInspector;

pub type CallbackTokenIssuer = dyn BearerTokenIssuer<Binding = AudienceBinding>;

pub struct VerificationOrchestrator {
    inspector: VerificationTokenInspector,
    keys: Arc<KeyRegistry>,
    token_issuer: Arc<CallbackTokenIssuer>,
    dispatcher: Arc<dyn CallbackDispatcher>,
    blacklist: Option<Arc<dyn BlacklistChecker>>,
    devops_numbers: HashSet<String>,
    messages: VerificationMessages,
}

impl VerificationOrchestrator {
    pub fn new(
        keys: Arc<KeyRegistry>,
        token_issuer: Arc<CallbackTokenIssuer>,
        dispatcher: Arc<dyn CallbackDispatcher>,
        config: &VerificationConfig,
    ) -> Self {
        let devops_numbers = config
            .devops_numbers
            .iter()
            .map(|n| normalize_phone(n))
            .filter(|n| !n.is_empty())
            .collect();

        Self {
            inspector: VerificationTokenInspector::new(),
            keys,
            token_issuer,
            dispatcher,
            blacklist: None,
            devops_numbers,
            messages: config.messages.clone(),
        }
    }

    /// Enable the blacklist gate. Without a checker the gate is skipped.
    pub fn with_blacklist(mut self, blacklist: Arc<dyn BlacklistChecker>) -> Self {
        self.blacklist = Some(blacklist);
        self
    }

    /// True if `text` is shaped like a verification token.
    pub fn is_candidate(&self, text: &str) -> bool {
        self.inspector.classify(text).is_some()
    }

    /// Process a message and return the reply, or `None` if the message is not
    /// a verification token.
    pub async fn handle(&self, sender: &str, text: &str) -> Option<String> {
        self.handle_with_deadline(sender, text, None).await
    }

    /// Like [`Self::handle`], with the callback bounded by `deadline`.
    pub async fn handle_with_deadline(&self, sender: &str, text: &str, deadline: Option<Instant>) -> Option<String> {
        let outcome = self.evaluate(sender, text, deadline).await?;
        Some(self.messages.reply_for(&outcome).to_string())
    }

    /// Run the state machine and return the terminal outcome.
    pub async fn evaluate(&self, sender: &str, text: &str, deadline: Option<Instant>) -> Option<VerificationOutcome> {
        let candidate = self.inspector.classify(text)?;
        let phone = normalize_phone(sender);

        let outcome = match self.run_gates(&phone, text, candidate.claimed_app_name(), deadline).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let reason = RejectReason::from(&e);
                if reason.is_fault() {
                    error!(
                        phone = %phone,
                        app = %candidate.claimed_app_name(),
                        reason = %reason,
                        stage = ?reason.stage(),
                        error = %e,
                        "Verification failed"
                    );
                } else {
                    warn!(
                        phone = %phone,
                        app = %candidate.claimed_app_name(),
                        reason = %reason,
                        stage = ?reason.stage(),
                        error = %e,
                        "Verification rejected"
                    );
                }
                VerificationOutcome::Rejected(reason)
            }
        };
        Some(outcome)
    }

    async fn run_gates(
        &self,
        phone: &str,
        text: &str,
        claimed_app: &str,
        deadline: Option<Instant>,
    ) -> Result<VerificationOutcome, TrustError> {
        if let Some(blacklist) = &self.blacklist {
            let blocked = blacklist
                .is_blacklisted(phone)
                .await
                .map_err(|e| TrustError::BlacklistUnavailable(e.to_string()))?;
            if blocked {
                return Err(TrustError::Blacklisted(phone.to_string()));
            }
        }

        let tenant = self.keys.lookup(claimed_app)?;
        let verified = self.inspector.verify(text, tenant)?;
        if verified.app_name() != tenant.tenant_id() {
            return Err(TrustError::InvalidSignature(format!(
                "token names app {:?} but verified against {:?}",
                verified.app_name(),
                tenant.tenant_id()
            )));
        }

        // An identity without digits never matches, not even another empty one
        let claimed = normalize_phone(verified.mobile());
        let devops_override = if !phone.is_empty() && phone == claimed {
            false
        } else if self.devops_numbers.contains(phone) {
            info!(sender = %phone, claim_mobile = %claimed, "Devops override: phone mismatch allowed");
            true
        } else {
            return Err(TrustError::PhoneMismatch {
                sender: phone.to_string(),
                claimed,
            });
        };

        let callback_url = tenant
            .callback_url(verified.challenge_id())
            .map_err(|e| TrustError::CallbackFailed(e.to_string()))?;
        if callback_url.origin() != tenant.callback_base_url().origin() {
            return Err(TrustError::CallbackFailed(format!(
                "callback URL {} left the registered origin",
                callback_url
            )));
        }

        let binding = AudienceBinding {
            audience: Some(tenant.tenant_id().to_string()),
            challenge_id: Some(verified.challenge_id().to_string()),
        };
        let callback_token = self.token_issuer.issue_bound(phone, binding)?;

        let dispatch = self.dispatcher.post(&callback_url, &callback_token);
        match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, dispatch)
                .await
                .map_err(|_| TrustError::CallbackFailed(format!("deadline exceeded calling {}", callback_url)))??,
            None => dispatch.await?,
        }

        info!(
            phone = %phone,
            app = %tenant.tenant_id(),
            challenge_id = %verified.challenge_id(),
            devops_override,
            "Verification successful"
        );
        Ok(VerificationOutcome::Verified {
            tenant_id: tenant.tenant_id().to_string(),
            challenge_id: verified.challenge_id().to_string(),
            devops_override,
        })
    }

    pub fn messages(&self) -> &VerificationMessages {
        &self.messages
    }
}
