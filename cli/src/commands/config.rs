// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use verigate_core::application::create_gateway;
use verigate_core::domain::gateway_config::GatewayConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration and load every configured key
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. VERIGATE_CONFIG_PATH: {}",
            std::env::var("VERIGATE_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./verigate-config.yaml");
        println!("  4. ~/.verigate/config.yaml");
        println!("  5. /etc/verigate/config.yaml");
        println!();
    }

    let config = GatewayConfig::load_or_default(config_override).context("Failed to load configuration")?;

    println!("{}", "Current configuration:".bold());
    println!();
    print!("{}", config.to_yaml_string().context("Failed to render configuration")?);

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = GatewayConfig::load_or_default(config_path).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    let gateway = create_gateway(&config).context("Failed to load keys")?;

    println!("{}", "✓ Configuration is valid".green());
    println!(
        "  Reverse verification: {}",
        if gateway.router.verification().is_some() {
            format!("enabled ({} apps)", gateway.keys.len())
        } else {
            "disabled".to_string()
        }
    );
    for tenant_id in gateway.keys.tenant_ids() {
        println!("    - {}", tenant_id);
    }
    println!(
        "  Login handshake: {}",
        if gateway.router.login().is_some() { "enabled" } else { "disabled" }
    );

    Ok(())
}
