// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

// Gateway Configuration Types
//
// Defines the configuration schema for the verification and token-trust engine:
// - RS256 signing key for agent bearer tokens and tenant callbacks
// - EdDSA signing key, deep-link base URL and rate limit for the login handshake
// - Registered tenant applications (public key + static callback base URL)
// - Devops override numbers, seed blacklist and user-facing reply texts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::phone::normalize_phone;
use crate::domain::tenant::{parse_callback_base_url, TenantAlgorithm};
use crate::domain::token::ttl_seconds;
use crate::domain::verification::VerificationMessages;

/// Top-level gateway configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway signing keys
    #[serde(default)]
    pub auth: AuthConfig,

    /// Reverse verification (tenant token forwarding)
    #[serde(default)]
    pub verification: VerificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// RS256 issuer used for agent bearer tokens and verification callbacks
    #[serde(default)]
    pub jwt: JwtConfig,

    /// EdDSA issuer used for the channel login handshake
    #[serde(default)]
    pub oauth: OAuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// PEM file holding an RSA private key (PKCS#1 or PKCS#8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Fixed audience for agent tokens. Empty means no `aud` claim.
    #[serde(default)]
    pub audience: String,

    #[serde(default = "default_jwt_ttl", with = "humantime_serde")]
    pub ttl: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Ed25519 private key: PKCS#8 PEM or a raw 32-byte seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,

    /// Base URL of the single-page app receiving the deep link
    #[serde(default)]
    pub spa_url: String,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default)]
    pub audience: String,

    #[serde(default = "default_oauth_ttl", with = "humantime_serde")]
    pub ttl: Duration,

    /// Maximum AUTH requests per sender within `rate_window`
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    #[serde(default = "default_rate_window", with = "humantime_serde")]
    pub rate_window: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_callback_timeout", with = "humantime_serde")]
    pub callback_timeout: Duration,

    /// Senders allowed to bypass the phone-match check (operational testing)
    #[serde(default)]
    pub devops_numbers: Vec<String>,

    /// Numbers blocked at startup; loaded into the in-memory blacklist
    #[serde(default)]
    pub blacklisted_numbers: Vec<String>,

    /// Registered tenant applications keyed by tenant id (`app_name` claim)
    #[serde(default)]
    pub apps: BTreeMap<String, AppVerifyConfig>,

    #[serde(default)]
    pub messages: VerificationMessages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppVerifyConfig {
    /// PEM-encoded public key the tenant signs verification tokens with
    pub public_key_path: PathBuf,

    /// Where the signed callback goes. Never taken from the token.
    pub callback_base_url: String,

    #[serde(default)]
    pub algorithm: TenantAlgorithm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_issuer() -> String {
    "verigate-gateway".to_string()
}

fn default_jwt_ttl() -> Duration {
    Duration::from_secs(2 * 60)
}

fn default_oauth_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_rate_limit() -> u32 {
    5
}

fn default_rate_window() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_callback_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            private_key_path: None,
            issuer: default_issuer(),
            audience: String::new(),
            ttl: default_jwt_ttl(),
        }
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            key_path: None,
            spa_url: String::new(),
            issuer: default_issuer(),
            audience: String::new(),
            ttl: default_oauth_ttl(),
            rate_limit: default_rate_limit(),
            rate_window: default_rate_window(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            callback_timeout: default_callback_timeout(),
            devops_numbers: vec![],
            blacklisted_numbers: vec![],
            apps: BTreeMap::new(),
            messages: VerificationMessages::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. VERIGATE_CONFIG_PATH environment variable
    /// 2. ./verigate-config.yaml (working directory)
    /// 3. ~/.verigate/config.yaml (user home)
    /// 4. /etc/verigate/config.yaml (system, Unix)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("VERIGATE_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./verigate-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".verigate").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/verigate/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", config_path, e))?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("AUTH_JWT_PRIVATE_KEY_PATH").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: AUTH_JWT_PRIVATE_KEY_PATH");
            self.auth.jwt.private_key_path = Some(PathBuf::from(path));
        }

        if let Some(val) = lookup("VERIFICATION_ENABLED") {
            if let Some(enabled) = parse_flag("VERIFICATION_ENABLED", &val) {
                self.verification.enabled = enabled;
            }
        }

        if let Some(val) = lookup("VERIFICATION_CALLBACK_TIMEOUT") {
            match humantime_serde::re::humantime::parse_duration(&val) {
                Ok(timeout) => {
                    tracing::info!("Environment override: VERIFICATION_CALLBACK_TIMEOUT={}", val);
                    self.verification.callback_timeout = timeout;
                }
                Err(e) => {
                    tracing::warn!(
                        "Invalid value for VERIFICATION_CALLBACK_TIMEOUT: '{}' ({}). Ignoring.",
                        val,
                        e
                    );
                }
            }
        }

        if let Some(val) = lookup("OAUTH_ENABLED") {
            if let Some(enabled) = parse_flag("OAUTH_ENABLED", &val) {
                self.auth.oauth.enabled = enabled;
            }
        }

        if let Some(path) = lookup("OAUTH_KEY_PATH").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: OAUTH_KEY_PATH");
            self.auth.oauth.key_path = Some(PathBuf::from(path));
        }

        if let Some(url) = lookup("OAUTH_SPA_URL").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: OAUTH_SPA_URL={}", url);
            self.auth.oauth.spa_url = url;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        ttl_seconds(self.auth.jwt.ttl).map_err(|e| anyhow::anyhow!("auth.jwt.ttl: {}", e))?;

        if self.verification.enabled {
            if self.auth.jwt.private_key_path.is_none() {
                anyhow::bail!("verification requires auth.jwt.private_key_path to be set");
            }
            if self.verification.callback_timeout.is_zero() {
                anyhow::bail!("verification.callback_timeout must be greater than zero");
            }
            for (tenant_id, app) in &self.verification.apps {
                if tenant_id.is_empty() {
                    anyhow::bail!("verification app id cannot be empty");
                }
                if app.public_key_path.as_os_str().is_empty() {
                    anyhow::bail!("public_key_path cannot be empty for app: {}", tenant_id);
                }
                parse_callback_base_url(&app.callback_base_url)
                    .map_err(|e| anyhow::anyhow!("app {}: {}", tenant_id, e))?;
            }
            for number in &self.verification.devops_numbers {
                if normalize_phone(number).is_empty() {
                    anyhow::bail!("devops number {:?} contains no digits", number);
                }
            }
        }

        let oauth = &self.auth.oauth;
        if oauth.enabled {
            if oauth.key_path.is_none() {
                anyhow::bail!("auth.oauth.enabled requires auth.oauth.key_path");
            }
            if oauth.spa_url.is_empty() {
                anyhow::bail!("auth.oauth.enabled requires auth.oauth.spa_url");
            }
            if oauth.rate_limit == 0 {
                anyhow::bail!("auth.oauth.rate_limit must be at least 1");
            }
            if oauth.rate_window.is_zero() {
                anyhow::bail!("auth.oauth.rate_window must be greater than zero");
            }
            ttl_seconds(oauth.ttl).map_err(|e| anyhow::anyhow!("auth.oauth.ttl: {}", e))?;
        }

        Ok(())
    }
}

fn parse_flag(name: &str, val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => {
            tracing::info!("Environment override: {}=true", name);
            Some(true)
        }
        "false" | "0" | "no" | "off" => {
            tracing::info!("Environment override: {}=false", name);
            Some(false)
        }
        _ => {
            tracing::warn!("Invalid value for {}: '{}'. Expected true/false. Ignoring.", name, val);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
auth:
  jwt:
    private_key_path: secrets/gateway_rsa.pem
    audience: adk-agent
  oauth:
    enabled: true
    key_path: secrets/oauth_ed25519.pem
    spa_url: https://login.example.com/
    audience: adk-spa
verification:
  enabled: true
  callback_timeout: 5s
  devops_numbers: ["+91 99999 99999"]
  apps:
    test-app:
      public_key_path: keys/test-app.pem
      callback_base_url: https://test-app.example.com/api
  messages:
    success: "done"
"#;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.auth.jwt.ttl, Duration::from_secs(120));
        assert_eq!(config.auth.oauth.ttl, Duration::from_secs(86_400));
        assert_eq!(config.auth.oauth.rate_limit, 5);
        assert_eq!(config.auth.oauth.rate_window, Duration::from_secs(3600));
        assert_eq!(config.verification.callback_timeout, Duration::from_secs(10));
        assert!(!config.verification.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sample() {
        let config = GatewayConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.auth.jwt.issuer, "verigate-gateway");
        assert_eq!(config.auth.jwt.audience, "adk-agent");
        assert_eq!(config.verification.callback_timeout, Duration::from_secs(5));
        let app = &config.verification.apps["test-app"];
        assert_eq!(app.algorithm, TenantAlgorithm::Rs256);
        assert_eq!(app.callback_base_url, "https://test-app.example.com/api");
        assert_eq!(config.verification.messages.success, "done");
        assert!(config.verification.messages.error.contains("Something went wrong"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip_keeps_durations() {
        let config = GatewayConfig::from_yaml_str(SAMPLE).unwrap();
        let yaml = config.to_yaml_string().unwrap();
        let parsed = GatewayConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.verification.callback_timeout, Duration::from_secs(5));
        assert_eq!(parsed.auth.oauth.ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn test_validation() {
        let mut config = GatewayConfig::from_yaml_str(SAMPLE).unwrap();
        assert!(config.validate().is_ok());

        config.auth.jwt.private_key_path = None;
        assert!(config.validate().is_err());
        config.auth.jwt.private_key_path = Some(PathBuf::from("k.pem"));

        config.auth.oauth.spa_url.clear();
        assert!(config.validate().is_err());
        config.auth.oauth.spa_url = "https://login.example.com".into();

        config.auth.oauth.rate_limit = 0;
        assert!(config.validate().is_err());
        config.auth.oauth.rate_limit = 5;

        config.verification.apps.get_mut("test-app").unwrap().callback_base_url = "file:///etc/passwd".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_fractional_ttls() {
        let mut config = GatewayConfig::from_yaml_str(SAMPLE).unwrap();
        config.auth.jwt.ttl = Duration::from_millis(1500);
        assert!(config.validate().is_err());

        config.auth.jwt.ttl = Duration::from_secs(120);
        config.auth.oauth.ttl = Duration::from_millis(86_400_500);
        assert!(config.validate().is_err());

        config.auth.oauth.ttl = Duration::from_secs(86_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fractional_ttl_from_yaml_fails_validation() {
        let config = GatewayConfig::from_yaml_str("auth:\n  jwt:\n    ttl: 1500ms\n").unwrap();
        assert_eq!(config.auth.jwt.ttl, Duration::from_millis(1500));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AUTH_JWT_PRIVATE_KEY_PATH", "/run/secrets/rsa.pem"),
            ("VERIFICATION_ENABLED", "yes"),
            ("VERIFICATION_CALLBACK_TIMEOUT", "3s"),
            ("OAUTH_ENABLED", "maybe"),
            ("OAUTH_SPA_URL", "https://spa.example.com"),
        ]);
        let mut config = GatewayConfig::default();
        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.auth.jwt.private_key_path, Some(PathBuf::from("/run/secrets/rsa.pem")));
        assert!(config.verification.enabled);
        assert_eq!(config.verification.callback_timeout, Duration::from_secs(3));
        // Unparseable flag leaves the value untouched
        assert!(!config.auth.oauth.enabled);
        assert_eq!(config.auth.oauth.spa_url, "https://spa.example.com");
    }

    #[test]
    fn test_invalid_timeout_override_is_ignored() {
        let mut config = GatewayConfig::default();
        config.apply_overrides_from(|key| (key == "VERIFICATION_CALLBACK_TIMEOUT").then(|| "soon".to_string()));
        assert_eq!(config.verification.callback_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let result = GatewayConfig::load_or_default(Some(PathBuf::from("/nonexistent/verigate.yaml")));
        assert!(result.is_err());
    }
}
