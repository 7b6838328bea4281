// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Route a single inbound message through the engine, as if it arrived on
//! the channel, and print the reply.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use verigate_core::application::create_gateway;
use verigate_core::domain::gateway_config::GatewayConfig;

pub async fn run(config_override: Option<PathBuf>, from: &str, text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read message from stdin")?;
            buf
        }
    };

    let config = GatewayConfig::load_or_default(config_override).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    let gateway = create_gateway(&config).context("Failed to build gateway")?;

    debug!(from = %from, "Routing simulated inbound message");
    match gateway.router.route(from, &text).await {
        Some(reply) => println!("{}", reply),
        None => eprintln!("{}", "Message not handled by verification or login.".yellow()),
    }
    Ok(())
}
