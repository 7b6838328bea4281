// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Lookup capability for identities barred from verification.
///
/// Identities are passed already normalized to digits. An `Err` is an
/// unexpected collaborator fault; callers fail closed on it.
#[async_trait]
pub trait BlacklistChecker: Send + Sync {
    async fn is_blacklisted(&self, identity: &str) -> Result<bool>;
}

/// A blocked identity and why it was blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub phone: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
