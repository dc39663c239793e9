//! Client configuration management
//!
//! Settings come from `~/.arc200/config.toml` when present, then from the
//! `ALGOD_URL`, `ALGOD_TOKEN` and `WALLET_MNEMONIC` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::wallet::Wallet;
use crate::SdkError;

/// Node URL override
pub const ENV_ALGOD_URL: &str = "ALGOD_URL";
/// Node API token override
pub const ENV_ALGOD_TOKEN: &str = "ALGOD_TOKEN";
/// Signing mnemonic override
pub const ENV_WALLET_MNEMONIC: &str = "WALLET_MNEMONIC";

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// algod endpoint URL
    #[serde(default = "default_algod_url")]
    pub algod_url: String,
    /// algod API token, sent as `X-Algo-API-Token`
    #[serde(default)]
    pub algod_token: String,
    /// Default flat fee of application calls
    #[serde(default = "default_fee")]
    pub fee: u64,
    /// Request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// 25-word signing mnemonic
    #[serde(default)]
    pub mnemonic: Option<String>,
}

fn default_algod_url() -> String {
    "https://testnet-api.voi.nodly.io".to_string()
}

fn default_fee() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            algod_url: default_algod_url(),
            algod_token: String::new(),
            fee: default_fee(),
            request_timeout_secs: None,
            mnemonic: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("algod_url", &self.algod_url)
            .field("fee", &self.fee)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".arc200"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load the config file, or defaults when there is none
    pub fn load() -> Result<Self, SdkError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a specific config file
    pub fn load_from(path: &Path) -> Result<Self, SdkError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Config file overlaid with environment variables
    pub fn from_env() -> Result<Self, SdkError> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values found by `lookup`; empty values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_ALGOD_URL) {
            self.algod_url = url;
        }
        if let Some(token) = lookup(ENV_ALGOD_TOKEN) {
            self.algod_token = token;
        }
        if let Some(mnemonic) = lookup(ENV_WALLET_MNEMONIC) {
            self.mnemonic = Some(mnemonic);
        }
    }

    /// Save config to a file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), SdkError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SdkError::Config(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<(), SdkError> {
        let path = Self::config_path()
            .ok_or_else(|| SdkError::Config("Cannot determine config path".to_string()))?;
        self.save_to(&path)
    }

    /// Request timeout, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Wallet for the configured mnemonic
    pub fn wallet(&self) -> Result<Wallet, SdkError> {
        let mnemonic = self
            .mnemonic
            .as_deref()
            .ok_or_else(|| SdkError::Config(format!("no mnemonic configured (set {})", ENV_WALLET_MNEMONIC)))?;
        Wallet::from_mnemonic(mnemonic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.algod_url, "https://testnet-api.voi.nodly.io");
        assert_eq!(config.algod_token, "");
        assert_eq!(config.fee, 1000);
        assert!(config.mnemonic.is_none());
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            algod_url = "http://localhost:4001"
            algod_token = "aaaa"
            request_timeout_secs = 10
        "#;
        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.algod_url, "http://localhost:4001");
        assert_eq!(config.algod_token, "aaaa");
        assert_eq!(config.fee, 1000);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ClientConfig {
            fee: 2000,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = ClientConfig::load_from(&path).unwrap();
        assert_eq!(loaded.fee, 2000);
        assert_eq!(loaded.algod_url, config.algod_url);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fee = \"lots\"").unwrap();
        assert!(matches!(ClientConfig::load_from(&path), Err(SdkError::Config(_))));
        assert!(matches!(
            ClientConfig::load_from(&dir.path().join("missing.toml")),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_ALGOD_URL, "http://node:8080"),
            (ENV_ALGOD_TOKEN, ""),
            (ENV_WALLET_MNEMONIC, "one two"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig {
            algod_token: "keep".to_string(),
            ..Default::default()
        };
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.algod_url, "http://node:8080");
        assert_eq!(config.algod_token, "keep");
        assert_eq!(config.mnemonic.as_deref(), Some("one two"));
    }

    #[test]
    fn test_wallet_from_config() {
        assert!(matches!(ClientConfig::default().wallet(), Err(SdkError::Config(_))));

        let phrase = Wallet::from_seed(&[3u8; 32]).to_mnemonic();
        let config = ClientConfig {
            mnemonic: Some(phrase),
            ..Default::default()
        };
        assert_eq!(
            config.wallet().unwrap().address(),
            Wallet::from_seed(&[3u8; 32]).address()
        );
    }

    #[test]
    fn test_debug_redacts_mnemonic() {
        let config = ClientConfig {
            mnemonic: Some("secret words".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
    }
}
