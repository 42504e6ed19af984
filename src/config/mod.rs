//! # Configuration Management Module
//!
//! Settings for the pet service, loaded from a TOML file. Every section has
//! defaults, so a file only needs the values it changes.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - HTTP bind address and port
//! - [`StorageConfig`] - Data directory for the pet record
//! - [`PetConfig`] - Name given to newly hatched pets
//! - [`SimulationConfig`] - Random seed and action strictness
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use petdash::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml").await?;
//!     let config = Config::load("config.toml").await?;
//!     println!("Listening on {}", config.listen_addr());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 8081
//!
//! [storage]
//! data_dir = "./data"
//!
//! [pet]
//! default_name = "Buddy"
//!
//! [simulation]
//! # seed = 42
//! strict_actions = false
//!
//! [logging]
//! level = "info"
//! # file = "petdash.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::pet::entity::{sanitize_name, MAX_NAME_CHARS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8081,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// Name used on first start and for resets without an explicit name.
    pub default_name: String,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            default_name: "Buddy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed seed for poop/sickness rolls. Unset uses the thread RNG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Reject actions with a missing or unknown subtype instead of applying
    /// the category's default effect.
    pub strict_actions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub pet: PetConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be non-zero"));
        }
        if sanitize_name(&self.pet.default_name).is_none() {
            return Err(anyhow!(
                "pet.default_name must be 1-{} printable characters, got {:?}",
                MAX_NAME_CHARS,
                self.pet.default_name
            ));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        Ok(())
    }

    /// `bind:port` as accepted by `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
