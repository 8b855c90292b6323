use std::path::PathBuf;
use thiserror::Error;

use crate::workflow::export::default_export_dir;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001/api";
pub const BACKEND_URL_VAR: &str = "FLOWCHAT_BACKEND_URL";
pub const EXPORT_DIR_VAR: &str = "FLOWCHAT_EXPORT_DIR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = lookup(BACKEND_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                var: BACKEND_URL_VAR,
                value: backend_url,
            });
        }

        let export_dir = lookup(EXPORT_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_export_dir);

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            export_dir,
        })
    }
}
