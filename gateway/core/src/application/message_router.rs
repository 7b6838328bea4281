// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, error};

use crate::application::login_handshake::LoginHandshakeHandler;
use crate::application::verification_service::VerificationOrchestrator;
use crate::domain::verification::VerificationMessages;

/// Entry point for inbound channel text.
///
/// Verification tokens go to the orchestrator, `AUTH` commands to the login
/// handler. Anything else returns `None` and belongs to the caller's normal
/// message path. A disabled flow leaves its messages unclaimed.
pub struct MessageRouter {
    verification: Option<Arc<VerificationOrchestrator>>,
    login: Option<Arc<LoginHandshakeHandler>>,
    error_reply: String,
}

impl MessageRouter {
    pub fn new(
        verification: Option<Arc<VerificationOrchestrator>>,
        login: Option<Arc<LoginHandshakeHandler>>,
    ) -> Self {
        let error_reply = verification
            .as_ref()
            .map(|v| v.messages().error.clone())
            .unwrap_or_else(|| VerificationMessages::default().error);
        Self {
            verification,
            login,
            error_reply,
        }
    }

    pub async fn route(&self, sender: &str, text: &str) -> Option<String> {
        self.route_with_deadline(sender, text, None).await
    }

    /// Like [`Self::route`]. A verification callback still pending at
    /// `deadline` is abandoned and answered with the generic error reply.
    pub async fn route_with_deadline(&self, sender: &str, text: &str, deadline: Option<Instant>) -> Option<String> {
        if let Some(verification) = &self.verification {
            if let Some(reply) = verification.handle_with_deadline(sender, text, deadline).await {
                return Some(reply);
            }
        }

        if let Some(login) = &self.login {
            if LoginHandshakeHandler::is_command(text) {
                return match login.handle(sender, text) {
                    Ok(reply) => Some(reply),
                    Err(e) => {
                        error!(error = %e, "AUTH command failed");
                        Some(self.error_reply.clone())
                    }
                };
            }
        }

        debug!("Message not handled by verification or login");
        None
    }

    pub fn verification(&self) -> Option<&Arc<VerificationOrchestrator>> {
        self.verification.as_ref()
    }

    pub fn login(&self) -> Option<&Arc<LoginHandshakeHandler>> {
        self.login.as_ref()
    }
}
