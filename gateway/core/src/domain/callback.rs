// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use url::Url;

use crate::domain::error::TrustError;

/// Outbound signed callback into a tenant application.
///
/// Implementations must not follow redirects and must treat any status of 400
/// or above as [`TrustError::CallbackFailed`]. No retries.
#[async_trait]
pub trait CallbackDispatcher: Send + Sync {
    async fn post(&self, url: &Url, bearer_token: &str) -> Result<(), TrustError>;
}
