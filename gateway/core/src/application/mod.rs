// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod gateway_factory;
pub mod login_handshake;
pub mod message_router;
pub mod verification_service;

// Re-export services for convenience
pub use gateway_factory::{create_gateway, create_gateway_with_dispatcher, Gateway};
pub use login_handshake::LoginHandshakeHandler;
pub use message_router::MessageRouter;
pub use verification_service::VerificationOrchestrator;
