// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Verigate CLI

pub mod config;
pub mod keys;
pub mod simulate;
pub mod token;

pub use self::config::ConfigCommand;
pub use self::token::TokenCommand;
