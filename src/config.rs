use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cryptofi.db?mode=rwc";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8000";

/// Storage connection settings. Credentials, if any, travel inside `url`.
/// `region` is accepted for deployments that set it but the SQLite backend
/// has no notion of regions, so it is only reported at startup.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// sqlx connection URL
    pub url: String,
    /// `STORAGE_REGION`
    pub region: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Items fetched per scan page
    pub scan_page_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            region: None,
            max_connections: 5,
            connect_timeout_secs: 30,
            scan_page_size: 100,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("DATABASE_URL", defaults.url),
            region: env::var("STORAGE_REGION")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            connect_timeout_secs: env_or("DATABASE_CONNECT_TIMEOUT", defaults.connect_timeout_secs),
            // a zero page size would never make progress
            scan_page_size: env_or("SCAN_PAGE_SIZE", defaults.scan_page_size).max(1),
        }
    }
}

/// Locations of the JSON documents used to seed empty tables.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub prices_path: PathBuf,
    pub balances_path: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            prices_path: PathBuf::from("data/prices.json"),
            balances_path: PathBuf::from("data/balances.json"),
        }
    }
}

impl SeedConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            prices_path: env_or("SEED_PRICES_PATH", defaults.prices_path),
            balances_path: env_or("SEED_BALANCES_PATH", defaults.balances_path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_address: String,
    pub storage: StorageConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from the environment. Every value has a local default,
    /// so this never fails.
    pub fn from_env() -> Self {
        Self {
            server_address: env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS.to_string()),
            storage: StorageConfig::from_env(),
            seed: SeedConfig::from_env(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
