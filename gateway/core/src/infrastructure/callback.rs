// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # HTTP Callback Dispatcher
//!
//! Delivers the gateway-signed verification assertion to a tenant:
//! `POST <url>` with an empty body and `Authorization: Bearer <jwt>`.
//!
//! Redirects are never followed, so a 3xx is a failure like any other non-2xx
//! status. At most [`MAX_ERROR_BODY_BYTES`] of an error body are kept for
//! diagnostics. No retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use tracing::debug;
use url::Url;

use crate::domain::callback::CallbackDispatcher;
use crate::domain::error::TrustError;

pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_ERROR_BODY_BYTES: usize = 1024;

#[derive(Debug, Clone)]
pub struct HttpCallbackDispatcher {
    client: Client,
    timeout: Duration,
}

impl HttpCallbackDispatcher {
    pub fn new(timeout: Duration) -> Result<Self, TrustError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| TrustError::Internal(format!("failed to build callback HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CallbackDispatcher for HttpCallbackDispatcher {
    async fn post(&self, url: &Url, bearer_token: &str) -> Result<(), TrustError> {
        let mut response = self
            .client
            .post(url.clone())
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| TrustError::CallbackFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Callback accepted");
            return Ok(());
        }

        let mut snippet = Vec::new();
        while snippet.len() < MAX_ERROR_BODY_BYTES {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let take = chunk.len().min(MAX_ERROR_BODY_BYTES - snippet.len());
                    snippet.extend_from_slice(&chunk[..take]);
                }
                Ok(None) | Err(_) => break,
            }
        }

        Err(TrustError::CallbackFailed(format!(
            "callback returned status {}: {}",
            status.as_u16(),
            String::from_utf8_lossy(&snippet)
        )))
    }
}
