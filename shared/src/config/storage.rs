//! Passcode storage backend selection

use serde::{Deserialize, Serialize};

/// Backend that holds passcode records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// MySQL table (durable)
    #[default]
    Mysql,
    /// Redis keys with TTL
    Redis,
    /// Process memory, lost on restart (development and tests)
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "database" => Ok(StorageBackend::Mysql),
            "redis" | "cache" => Ok(StorageBackend::Redis),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Mysql => write!(f, "mysql"),
            StorageBackend::Redis => write!(f, "redis"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let backend = std::env::var("OTP_STORAGE")
            .ok()
            .and_then(|b| b.parse().ok())
            .unwrap_or_default();
        Self { backend }
    }
}
