use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub markets: MarketsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketsConfig {
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_port() -> u16 { 3000 }
fn default_cache_ttl_secs() -> u64 { 300 }
fn default_page_limit() -> u32 { 100 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: default_cache_ttl_secs() }
    }
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self { page_limit: default_page_limit() }
    }
}

/// Secrets and endpoint overrides from the environment.
///
/// The Kalshi credentials are optional here: a missing key id or private key
/// only surfaces once an authenticated request is attempted, so the service
/// still starts and serves its unauthenticated routes.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub kalshi_api_base: String,
    pub kalshi_api_key_id: Option<String>,
    pub kalshi_private_key_pem: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        // Key material may be inline or a path to a PEM file
        let kalshi_private_key_pem = match std::env::var("KALSHI_PRIVATE_KEY") {
            Ok(pem) if !pem.trim().is_empty() => Some(pem),
            _ => match std::env::var("KALSHI_PRIVATE_KEY_PATH") {
                Ok(path) if !path.trim().is_empty() => Some(
                    fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read private key from {}", path))?,
                ),
                _ => None,
            },
        };

        Ok(Self {
            kalshi_api_base: std::env::var("KALSHI_API_BASE")
                .unwrap_or_else(|_| "https://api.elections.kalshi.com/trade-api/v2".to_string()),
            kalshi_api_key_id: std::env::var("KALSHI_API_KEY_ID")
                .ok()
                .filter(|id| !id.trim().is_empty()),
            kalshi_private_key_pem,
        })
    }
}
