// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Login signing key commands
//!
//! Commands: keygen, pubkey

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::EncodePrivateKey;
use ed25519_dalek::SigningKey;
use rand_core::OsRng;

use verigate_core::domain::gateway_config::GatewayConfig;
use verigate_core::infrastructure::keys::ed25519_public_key_base64;
use verigate_core::infrastructure::token::EdDsaTokenIssuer;

pub const DEFAULT_KEY_PATH: &str = "secrets/oauth_ed25519.pem";

/// Generate an Ed25519 login key and print its public half.
pub fn keygen(out: &Path) -> Result<()> {
    let public_key = write_new_key(out)?;

    println!(
        "{}",
        format!("✓ Ed25519 private key written to: {}", out.display()).green()
    );
    println!("Public key (base64url, share with the login app):");
    println!("  {}", public_key);
    Ok(())
}

/// Write a fresh PKCS#8 PEM key to `out` and return the base64url public key.
pub fn write_new_key(out: &Path) -> Result<String> {
    let signing_key = SigningKey::generate(&mut OsRng);
    let pem = signing_key
        .to_pkcs8_pem(LineEnding::LF)
        .context("Failed to encode private key")?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_private_dir(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(out)
        .with_context(|| format!("Failed to create key file {:?}", out))?;
    file.write_all(pem.as_bytes())
        .with_context(|| format!("Failed to write key file {:?}", out))?;

    Ok(ed25519_public_key_base64(&signing_key.verifying_key()))
}

fn create_private_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)
            .with_context(|| format!("Failed to create directory {:?}", dir))
    }
    #[cfg(not(unix))]
    {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))
    }
}

/// Print the public key of the configured login signing key.
pub fn pubkey(config_override: Option<PathBuf>) -> Result<()> {
    let config = GatewayConfig::load_or_default(config_override).context("Failed to load configuration")?;
    let issuer = EdDsaTokenIssuer::from_config(&config.auth.oauth).context("Failed to load login signing key")?;
    println!("{}", issuer.public_key_base64());
    Ok(())
}
