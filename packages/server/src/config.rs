use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

/// Where raw snapshots come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSourceKind {
    Http,
    Memory,
}

/// Where extraction results are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Postgres,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub document_source: DocumentSourceKind,
    pub snapshot_base_url: Option<String>,
    pub snapshot_timeout_secs: u64,
    pub soft_ttl_hours: i64,
    pub cache_backend: CacheBackend,
    pub database_url: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let document_source = match get("DOCUMENT_SOURCE").as_deref() {
            None | Some("http") => DocumentSourceKind::Http,
            Some("memory") => DocumentSourceKind::Memory,
            Some(other) => bail!("DOCUMENT_SOURCE must be http or memory, got {other:?}"),
        };

        let snapshot_base_url = get("SNAPSHOT_BASE_URL");
        if document_source == DocumentSourceKind::Http && snapshot_base_url.is_none() {
            bail!("SNAPSHOT_BASE_URL must be set");
        }

        let cache_backend = match get("CACHE_BACKEND").as_deref() {
            None | Some("memory") => CacheBackend::Memory,
            Some("postgres") => CacheBackend::Postgres,
            Some(other) => bail!("CACHE_BACKEND must be memory or postgres, got {other:?}"),
        };

        let database_url = get("DATABASE_URL");
        if cache_backend == CacheBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when CACHE_BACKEND=postgres");
        }

        Ok(Self {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            document_source,
            snapshot_base_url,
            snapshot_timeout_secs: get("SNAPSHOT_TIMEOUT_SECS")
                .unwrap_or_else(|| "20".to_string())
                .parse()
                .context("SNAPSHOT_TIMEOUT_SECS must be a valid number")?,
            soft_ttl_hours: get("SOFT_TTL_HOURS")
                .unwrap_or_else(|| "24".to_string())
                .parse()
                .context("SOFT_TTL_HOURS must be a valid number")?,
            cache_backend,
            database_url,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}
