//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::store::{StoreConfig, DEFAULT_OPERATION_TIMEOUT};

pub const DEFAULT_PORT: u16 = 3000;
const DOCUMENT_FILE: &str = "okrs.md";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// OKR document (from OKRDOWN_DOCUMENT)
    pub document: PathBuf,
    /// HTTP port (from OKRDOWN_PORT)
    pub port: u16,
    /// Budget per store operation (from OKRDOWN_TIMEOUT_MS)
    pub operation_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let document = match lookup("OKRDOWN_DOCUMENT") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
            _ => default_document_path()?,
        };

        let port = lookup("OKRDOWN_PORT")
            .map(|s| s.trim().parse::<u16>())
            .transpose()
            .context("OKRDOWN_PORT must be a port number")?
            .unwrap_or(DEFAULT_PORT);

        let operation_timeout = lookup("OKRDOWN_TIMEOUT_MS")
            .map(|s| s.trim().parse::<u64>())
            .transpose()
            .context("OKRDOWN_TIMEOUT_MS must be a number of milliseconds")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_OPERATION_TIMEOUT);

        Ok(Self {
            document,
            port,
            operation_timeout,
        })
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            operation_timeout: self.operation_timeout,
        }
    }
}

/// `okrs.md` in the platform data directory.
pub fn default_document_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "okrdown")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join(DOCUMENT_FILE))
}
