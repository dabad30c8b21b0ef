use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, ScrapeError};

/// Where blobs are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// One JSON file per blob under `{store_root}/{bucket}/`.
    Fs,
    /// Rows in a `blobs` table, keyed by bucket and name.
    Postgres,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub bucket: String,
    pub store_backend: StoreBackend,
    pub store_root: PathBuf,
    pub database_url: Option<String>,

    // HTTP
    pub max_connections: usize,
    pub http_timeout: Duration,

    // Sites
    pub stackoverflow_base_url: String,
    pub quora_base_url: String,
    pub reddit_base_url: String,

    // Request handling
    pub strict_sources: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: "tag-scraper".to_string(),
            store_backend: StoreBackend::Fs,
            store_root: PathBuf::from("data"),
            database_url: None,
            max_connections: 20,
            http_timeout: Duration::from_secs(30),
            stackoverflow_base_url: "http://www.stackoverflow.com".to_string(),
            quora_base_url: "http://www.quora.com".to_string(),
            reddit_base_url: "http://www.reddit.com".to_string(),
            strict_sources: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("fs") => StoreBackend::Fs,
            Some("postgres") => StoreBackend::Postgres,
            Some(other) => {
                return Err(ScrapeError::Config(format!(
                    "STORE_BACKEND must be \"fs\" or \"postgres\", got {other:?}"
                )))
            }
        };
        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ScrapeError::Config(
                "DATABASE_URL is required when STORE_BACKEND=postgres".to_string(),
            ));
        }

        let max_connections = match lookup("MAX_CONNECTIONS") {
            Some(v) => parse_number("MAX_CONNECTIONS", &v)?,
            None => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(ScrapeError::Config(
                "MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("HTTP_TIMEOUT_SECS", &v)?),
            None => defaults.http_timeout,
        };
        if http_timeout.is_zero() {
            return Err(ScrapeError::Config(
                "HTTP_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        let strict_sources = match lookup("STRICT_SOURCES").as_deref() {
            None => defaults.strict_sources,
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => {
                return Err(ScrapeError::Config(format!(
                    "STRICT_SOURCES must be a boolean, got {other:?}"
                )))
            }
        };

        Ok(Self {
            bucket: lookup("TAGSCRAPER_BUCKET").unwrap_or(defaults.bucket),
            store_backend,
            store_root: lookup("STORE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_root),
            database_url,
            max_connections,
            http_timeout,
            stackoverflow_base_url: lookup("STACKOVERFLOW_BASE_URL")
                .unwrap_or(defaults.stackoverflow_base_url),
            quora_base_url: lookup("QUORA_BASE_URL").unwrap_or(defaults.quora_base_url),
            reddit_base_url: lookup("REDDIT_BASE_URL").unwrap_or(defaults.reddit_base_url),
            strict_sources,
        })
    }

    /// Log the effective configuration with credentials masked.
    pub fn log_redacted(&self) {
        let database_url = self.database_url.as_deref().map(redact_url);
        info!(
            bucket = self.bucket.as_str(),
            store_backend = ?self.store_backend,
            store_root = %self.store_root.display(),
            database_url = database_url.as_deref().unwrap_or("-"),
            max_connections = self.max_connections,
            http_timeout_secs = self.http_timeout.as_secs(),
            strict_sources = self.strict_sources,
            "Config loaded"
        );
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScrapeError::Config(format!("{key} must be a number, got {value:?}")))
}

fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("****"));
            parsed.to_string()
        }
        Ok(parsed) => parsed.to_string(),
        Err(_) => "<unparseable>".to_string(),
    }
}
