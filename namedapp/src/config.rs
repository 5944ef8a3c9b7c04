//! Configuration for the dapp client.
//!
//! Configuration is a JSON file; every field has a default so an empty
//! object (or no file at all) is a valid configuration. The contract address
//! is not configurable here: it is [`NAME_DAPP_ADDRESS`](crate::contract::NAME_DAPP_ADDRESS).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default time a success message stays visible.
pub const DEFAULT_SUCCESS_DISPLAY_SECS: u64 = 6;

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid value.
    #[error("invalid: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an invalid value error.
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// What happens to the cached name list after a confirmed mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Mark the list stale; the user refetches explicitly.
    #[default]
    Manual,
    /// Refetch the list as soon as the mutation is confirmed.
    AfterMutation,
}

/// Key material for the local wallet.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Hex private key, with or without `0x`.
    pub private_key: Option<String>,
    /// BIP39 mnemonic; takes precedence over `private_key`.
    pub mnemonic: Option<String>,
    /// HD derivation index used with `mnemonic`.
    pub index: u32,
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "<redacted>"))
            .field("index", &self.index)
            .finish()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DappConfig {
    /// JSON-RPC endpoint of the chain the contract lives on.
    pub rpc_url: Option<String>,
    /// Chain ID; auto-detected from the endpoint when absent.
    pub chain_id: Option<u64>,
    /// Seconds a success message stays visible.
    pub success_display_secs: u64,
    /// Cache behaviour after a confirmed mutation.
    pub refresh: RefreshPolicy,
    /// Local wallet key material.
    pub wallet: WalletConfig,
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            chain_id: None,
            success_display_secs: DEFAULT_SUCCESS_DISPLAY_SECS,
            refresh: RefreshPolicy::Manual,
            wallet: WalletConfig::default(),
        }
    }
}

impl DappConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.success_display_secs == 0 {
            return Err(ConfigError::invalid("success_display_secs must be positive"));
        }
        if let Some(url) = &self.rpc_url {
            if url.trim().is_empty() {
                return Err(ConfigError::invalid("rpc_url must not be empty"));
            }
        }
        Ok(())
    }

    /// How long a success message stays visible.
    #[must_use]
    pub const fn success_display(&self) -> Duration {
        Duration::from_secs(self.success_display_secs)
    }
}

/// Default configuration file location.
#[must_use]
pub fn config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("namedapp")
        .join("config.json")
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is
/// tried and a missing file yields [`DappConfig::default`].
pub async fn load_config(path: Option<&Path>) -> Result<DappConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (config_path(), false),
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            debug!(path = %path.display(), "loading config");
            DappConfig::from_json(&content)
        }
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(DappConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}
