// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Verigate Core
//!
//! Multi-tenant verification and token-trust engine for a messaging-channel
//! gateway.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Issues gateway-signed assertions, verifies tenant-signed
//!   phone ownership tokens and calls tenants back over HTTP

pub mod domain;
pub mod application;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod testutil;

pub use domain::*;
