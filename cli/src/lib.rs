// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Verigate CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Command handlers behind the `verigate` binary

pub mod commands;
