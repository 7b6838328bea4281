// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Key Registry
//!
//! Tenant id → [`TenantKey`] map, built once from configuration and read-only
//! afterwards. Share it behind an `Arc`; lookups take no locks.

use std::collections::HashMap;
use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::error::TrustError;
use crate::domain::gateway_config::AppVerifyConfig;
use crate::domain::tenant::{parse_callback_base_url, TenantKey};
use crate::infrastructure::keys::load_public_key;

#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: HashMap<String, TenantKey>,
}

impl KeyRegistry {
    /// Load every configured tenant.
    ///
    /// Fails on the first tenant whose key file is missing, unparseable or of
    /// the wrong type, or whose callback base URL is not http(s). The error
    /// names that tenant.
    pub fn load(apps: &BTreeMap<String, AppVerifyConfig>) -> Result<Self, TrustError> {
        let mut keys = HashMap::with_capacity(apps.len());

        for (tenant_id, app) in apps {
            let owner = format!("tenant {:?}", tenant_id);
            let decoding_key = load_public_key(&owner, &app.public_key_path, app.algorithm)?;
            let callback_base_url = parse_callback_base_url(&app.callback_base_url)
                .map_err(|reason| TrustError::key_load(&owner, &app.public_key_path, reason))?;

            debug!(
                app = %tenant_id,
                algorithm = %app.algorithm,
                callback_base_url = %callback_base_url,
                "Loaded tenant verification key"
            );
            keys.insert(
                tenant_id.clone(),
                TenantKey::new(tenant_id.clone(), app.algorithm, decoding_key, callback_base_url),
            );
        }

        info!(count = keys.len(), "Key registry loaded");
        Ok(Self { keys })
    }

    /// Build a registry from already-constructed keys. Later duplicates win.
    pub fn from_keys(keys: impl IntoIterator<Item = TenantKey>) -> Self {
        Self {
            keys: keys
                .into_iter()
                .map(|key| (key.tenant_id().to_string(), key))
                .collect(),
        }
    }

    pub fn lookup(&self, tenant_id: &str) -> Result<&TenantKey, TrustError> {
        self.keys
            .get(tenant_id)
            .ok_or_else(|| TrustError::UnknownTenant(tenant_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registered tenant ids, sorted.
    pub fn tenant_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
