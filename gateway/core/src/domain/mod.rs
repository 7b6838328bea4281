// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Pure types and collaborator traits of the token-trust engine.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Claims, tenants, outcomes, configuration and the seams
//!   (blacklist, callback, issuance) implemented in infrastructure

pub mod blacklist;
pub mod callback;
pub mod claims;
pub mod error;
pub mod gateway_config;
pub mod phone;
pub mod tenant;
pub mod token;
pub mod verification;
