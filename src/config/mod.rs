use anyhow::{Context, Result};
use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the CSV data files
    pub data_dir: String,
    /// File name of the accounts ledger
    pub accounts_file: String,
    /// File name of the transaction log
    pub transactions_file: String,
}

impl StorageConfig {
    pub fn accounts_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.accounts_file)
    }

    pub fn transactions_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.transactions_file)
    }
}

/// Operation limits
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Largest amount accepted for a single deposit, withdrawal or transfer
    pub max_amount: Decimal,
}

/// Global application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Application version
    pub version: String,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Operation limits
    pub limits: LimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Console Banking System".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: StorageConfig {
                data_dir: "data".to_string(),
                accounts_file: "accounts.csv".to_string(),
                transactions_file: "transactions.csv".to_string(),
            },
            limits: LimitsConfig {
                max_amount: Decimal::new(100_000_00, 2),
            },
        }
    }
}

// Global configuration instance
lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

/// Load configuration from file
pub fn load_config(path: &str) -> Result<()> {
    // Check if file exists
    if !Path::new(path).exists() {
        // If not, create default config and save it
        let default_config = Config::default();
        save_config(path, &default_config)?;
        *CONFIG.write().unwrap() = default_config;
        return Ok(());
    }

    // Read the config file
    let mut file = File::open(path).context(format!("Failed to open config file: {}", path))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).context("Failed to read config file")?;

    // Parse the config file
    let config: Config = match path.ends_with(".toml") {
        true => toml::from_str(&contents).context("Failed to parse TOML config")?,
        false => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
    };

    // Update the global config
    *CONFIG.write().unwrap() = config;

    Ok(())
}

/// Save configuration to file
pub fn save_config(path: &str, config: &Config) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
    }

    // Serialize the config
    let serialized = match path.ends_with(".toml") {
        true => toml::to_string_pretty(config).context("Failed to serialize config to TOML")?,
        false => serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?,
    };

    // Write to file
    std::fs::write(path, serialized).context(format!("Failed to write config to file: {}", path))?;

    Ok(())
}

/// Get a reference to the current config
pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}

/// Update the current config
pub fn update_config(config: Config) -> Result<()> {
    *CONFIG.write().unwrap() = config;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "Console Banking System");
        assert_eq!(config.storage.accounts_file, "accounts.csv");
        assert_eq!(config.storage.transactions_file, "transactions.csv");
        assert_eq!(config.limits.max_amount, Decimal::new(100_000_00, 2));
    }

    #[test]
    fn test_storage_paths() {
        let config = Config::default();
        assert_eq!(
            config.storage.accounts_path(),
            Path::new("data").join("accounts.csv")
        );
        assert_eq!(
            config.storage.transactions_path(),
            Path::new("data").join("transactions.csv")
        );
    }

    #[test]
    fn test_load_save_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("test_config.toml");
        let config_path_str = config_path.to_str().unwrap();

        // Test saving default config
        let config = Config::default();
        save_config(config_path_str, &config).unwrap();

        // Test loading saved config
        load_config(config_path_str).unwrap();
        let loaded_config = get_config();

        assert_eq!(loaded_config.app_name, config.app_name);
        assert_eq!(loaded_config.storage.data_dir, config.storage.data_dir);
        assert_eq!(loaded_config.limits.max_amount, config.limits.max_amount);
    }
}
