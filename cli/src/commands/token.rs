// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Bearer token commands

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use verigate_core::domain::gateway_config::GatewayConfig;
use verigate_core::infrastructure::token::Rs256TokenIssuer;

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Mint an RS256 agent bearer token
    Agent {
        /// Subject (`user_id` claim), usually a phone number
        #[arg(long)]
        subject: String,

        /// Audience override (default: auth.jwt.audience)
        #[arg(long)]
        audience: Option<String>,
    },
}

pub async fn handle_command(command: TokenCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        TokenCommand::Agent { subject, audience } => {
            let config = GatewayConfig::load_or_default(config_override).context("Failed to load configuration")?;
            let issuer = Rs256TokenIssuer::from_config(&config.auth.jwt).context("Failed to load signing key")?;

            let token = match audience {
                Some(audience) => issuer.issue_with_audience(&subject, &audience),
                None => issuer.issue(&subject),
            }
            .context("Failed to sign token")?;

            println!("{}", token);
            Ok(())
        }
    }
}
