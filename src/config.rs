use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CASES_API_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Dynamodb,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    pub region: String,

    pub table_name: String,

    /// Custom endpoint, e.g. DynamoDB Local
    pub endpoint_url: Option<String>,

    /// Upper bound on a single store operation, retries included
    pub operation_timeout_secs: u64,

    /// Total attempts per store call (1 = no retries)
    pub max_attempts: u32,

    /// JSON array of records loaded by the memory backend
    pub seed_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Dynamodb,
            region: "us-east-1".to_string(),
            table_name: "jbhattar-covid-19-data".to_string(),
            endpoint_url: None,
            operation_timeout_secs: 10,
            max_attempts: 3,
            seed_path: None,
        }
    }
}

impl AppConfig {
    /// Load from `$CASES_API_CONFIG`, then `./config.toml`, then defaults.
    /// `PORT` overrides the configured port.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                Self::load_from_path(&path)?
            }
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from("config.toml");
        local.exists().then_some(local)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }
        if self.store.table_name.trim().is_empty() {
            anyhow::bail!("Store table name cannot be empty");
        }
        if self.store.backend == StoreBackend::Dynamodb {
            if self.store.region.trim().is_empty() {
                anyhow::bail!("Store region cannot be empty");
            }
            if self.store.operation_timeout_secs == 0 {
                anyhow::bail!("Store operation timeout must be at least 1 second");
            }
            if self.store.max_attempts == 0 {
                anyhow::bail!("Store max attempts must be at least 1");
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
