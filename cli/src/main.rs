// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # Verigate CLI
//!
//! The `verigate` binary manages keys and configuration for the gateway's
//! verification and token-trust engine.
//!
//! ## Commands
//!
//! - `verigate keygen [--out PATH]` - Generate the Ed25519 login signing key
//! - `verigate pubkey` - Print the configured login public key
//! - `verigate config show|validate` - Configuration management
//! - `verigate token agent --subject S` - Mint an RS256 agent bearer token
//! - `verigate simulate --from PHONE [TEXT]` - Route one inbound message

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use verigate_cli::commands::{self, ConfigCommand, TokenCommand};

/// Verigate - verification and token-trust engine for a messaging gateway
#[derive(Parser)]
#[command(name = "verigate")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "VERIGATE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "VERIGATE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Ed25519 login signing key
    #[command(name = "keygen")]
    Keygen {
        /// Output path for the PKCS#8 PEM file
        #[arg(long, default_value = commands::keys::DEFAULT_KEY_PATH)]
        out: PathBuf,
    },

    /// Print the public key of the configured login signing key
    #[command(name = "pubkey")]
    Pubkey,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Bearer token tooling
    #[command(name = "token")]
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },

    /// Route one inbound message through the engine and print the reply
    #[command(name = "simulate")]
    Simulate {
        /// Sender identity (phone number or channel JID)
        #[arg(long)]
        from: String,

        /// Message text (read from stdin when omitted)
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Keygen { out } => commands::keys::keygen(&out),
        Commands::Pubkey => commands::keys::pubkey(cli.config),
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
        Commands::Token { command } => commands::token::handle_command(command, cli.config).await,
        Commands::Simulate { from, text } => commands::simulate::run(cli.config, &from, text).await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
