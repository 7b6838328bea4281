// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::blacklist::{BlacklistChecker, BlacklistEntry};
use crate::domain::phone::normalize_phone;

/// Process-local blacklist. Seeded from configuration, mutable at runtime,
/// lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryBlacklist {
    entries: RwLock<HashMap<String, BlacklistEntry>>,
}

impl InMemoryBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with configured numbers. Entries without digits are skipped.
    pub fn with_numbers<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let created_at = Utc::now();
        let entries = numbers
            .into_iter()
            .map(|n| normalize_phone(n.as_ref()))
            .filter(|phone| !phone.is_empty())
            .map(|phone| {
                let entry = BlacklistEntry {
                    phone: phone.clone(),
                    reason: "configured".to_string(),
                    created_at,
                };
                (phone, entry)
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Block `phone`. Returns `false` if it was already blocked; the existing
    /// entry is kept unchanged.
    pub async fn add(&self, phone: &str, reason: &str) -> bool {
        let phone = normalize_phone(phone);
        if phone.is_empty() {
            return false;
        }

        let mut entries = self.entries.write().await;
        if entries.contains_key(&phone) {
            return false;
        }
        info!(phone = %phone, reason = %reason, "Number blacklisted");
        entries.insert(
            phone.clone(),
            BlacklistEntry {
                phone,
                reason: reason.to_string(),
                created_at: Utc::now(),
            },
        );
        true
    }

    /// Returns `true` if an entry was removed.
    pub async fn remove(&self, phone: &str) -> bool {
        let phone = normalize_phone(phone);
        let removed = self.entries.write().await.remove(&phone).is_some();
        if removed {
            info!(phone = %phone, "Number removed from blacklist");
        }
        removed
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Vec<BlacklistEntry> {
        let mut entries: Vec<BlacklistEntry> = self.entries.read().await.values().cloned().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.phone.cmp(&b.phone)));
        entries
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BlacklistChecker for InMemoryBlacklist {
    async fn is_blacklisted(&self, identity: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(&normalize_phone(identity)))
    }
}
