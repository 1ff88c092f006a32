//! Runtime configuration: API address, data directory and log filter.
//!
//! Values come from the environment (optionally seeded from a `.env` file)
//! and may be overridden by command-line flags.

use crate::api::DEFAULT_API_URL;
use crate::theme::ThemePreference;
use std::path::PathBuf;
use thiserror::Error;

pub const API_URL_VAR: &str = "CINERATE_API_URL";
pub const DATA_DIR_VAR: &str = "CINERATE_DATA_DIR";
pub const LOG_VAR: &str = "CINERATE_LOG";

const DEFAULT_LOG_FILTER: &str = "cinerate=info";
const STORAGE_FILE: &str = "storage.json";
const LOG_FILE: &str = "cinerate.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Could not determine a data directory; set CINERATE_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub log_filter: String,
    pub theme: ThemePreference,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub theme: Option<ThemePreference>,
}

impl Config {
    pub fn load(overrides: Overrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    fn resolve(
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_url = overrides
            .api_url
            .or_else(|| env(API_URL_VAR))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = validate_api_url(&api_url)?;

        let data_dir = match overrides.data_dir.or_else(|| env(DATA_DIR_VAR).map(PathBuf::from)) {
            Some(dir) => dir,
            None => directories::ProjectDirs::from("com", "cinerate", "cinerate")
                .ok_or(ConfigError::NoDataDir)?
                .data_dir()
                .to_path_buf(),
        };

        let log_filter = env(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            api_url,
            data_dir,
            log_filter,
            theme: overrides.theme.unwrap_or_default(),
        })
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

fn validate_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(trimmed.to_string())
}
