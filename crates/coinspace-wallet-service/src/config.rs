//! Wallet service configuration

use coinspace_core::{Error, Result};
use coinspace_params::NetworkName;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`WalletConfig::site_url`]
pub const SITE_URL_ENV: &str = "COINSPACE_SITE_URL";

const DATABASE_FILE: &str = "wallet.db";

/// Wallet service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Root of the auth, fee and history endpoints
    pub site_url: String,
    /// Network opened when the caller does not name one
    pub default_network: NetworkName,
    /// Directory holding the wallet database
    pub data_dir: PathBuf,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            site_url: "https://coin.space/api/".to_string(),
            default_network: NetworkName::Bitcoin,
            data_dir: default_data_dir(),
            request_timeout_secs: 30,
        }
    }
}

impl WalletConfig {
    /// Load from an optional JSON file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    Error::Configuration(format!("Invalid config {}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };

        if let Ok(site_url) = std::env::var(SITE_URL_ENV) {
            if !site_url.trim().is_empty() {
                config.site_url = site_url;
            }
        }

        Ok(config)
    }

    /// Path of the wallet database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("space", "Coin", "CoinSpace")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_network":"litecoin","request_timeout_secs":5}}"#).unwrap();

        let config = WalletConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_network, NetworkName::Litecoin);
        assert_eq!(config.request_timeout_secs, 5);
        assert!(!config.data_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_unknown_network_in_file_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_network":"dogecoin"}}"#).unwrap();

        assert!(matches!(
            WalletConfig::load(Some(file.path())),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            WalletConfig::load(Some(Path::new("/nonexistent/coinspace.json"))),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_database_path() {
        let config = WalletConfig {
            data_dir: PathBuf::from("/tmp/cs"),
            ..WalletConfig::default()
        };
        assert_eq!(config.database_path(), PathBuf::from("/tmp/cs/wallet.db"));
    }
}
