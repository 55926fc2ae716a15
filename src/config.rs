use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default remote endpoint.
/// Override at build time: QUOTESYNC_REMOTE_URL=https://example.com/posts cargo build
pub const REMOTE_URL: &str = match option_env!("QUOTESYNC_REMOTE_URL") {
    Some(url) => url,
    None => "https://jsonplaceholder.typicode.com/posts",
};

pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_REMOTE_LIMIT: usize = 0;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub remote_url: String,
    pub sync_interval: Duration,
    /// Max remote items merged per sync run. 0 means no cap.
    pub remote_limit: usize,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup("QUOTESYNC_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        let remote_url = lookup("QUOTESYNC_REMOTE_URL").unwrap_or_else(|| REMOTE_URL.to_string());
        validate_url(&remote_url)?;

        let sync_interval = Duration::from_secs(parse_or(
            &lookup,
            "QUOTESYNC_SYNC_INTERVAL_SECS",
            DEFAULT_SYNC_INTERVAL_SECS,
        )?);
        if sync_interval.is_zero() {
            return Err(Error::Config(
                "QUOTESYNC_SYNC_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let http_timeout = Duration::from_secs(parse_or(
            &lookup,
            "QUOTESYNC_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);
        if http_timeout.is_zero() {
            return Err(Error::Config(
                "QUOTESYNC_HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            data_dir,
            remote_url,
            sync_interval,
            remote_limit: parse_or(&lookup, "QUOTESYNC_REMOTE_LIMIT", DEFAULT_REMOTE_LIMIT)?,
            http_timeout,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, remote_url: Option<String>) -> Result<Self> {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(url) = remote_url {
            validate_url(&url)?;
            self.remote_url = url;
        }
        Ok(self)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("quotesync"))
        .ok_or_else(|| Error::Config("could not determine a data directory".to_string()))
}

fn validate_url(raw: &str) -> Result<()> {
    let parsed =
        url::Url::parse(raw).map_err(|e| Error::Config(format!("invalid remote URL {raw}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "remote URL must be http or https, got {other}"
        ))),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{key}={raw}: {e}"))),
    }
}
