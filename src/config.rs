//! Runtime configuration.
//!
//! Use the builder pattern to override defaults, or [`DashboardConfig::from_env`]
//! to read the `CVEDASH_*` variables.
//!
//! ```ignore
//! use cvedash::config::DashboardConfig;
//!
//! let config = DashboardConfig::default()
//!     .with_api_url("https://cve.example.com/")
//!     .with_export_dir("/tmp/exports");
//! assert_eq!(config.api_url, "https://cve.example.com");
//! ```

use std::path::PathBuf;

/// Backend used when `CVEDASH_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "CVEDASH_API_URL";
pub const ENV_EXPORT_DIR: &str = "CVEDASH_EXPORT_DIR";
pub const ENV_SESSION_DIR: &str = "CVEDASH_SESSION_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend base URL, without a trailing slash
    pub api_url: String,
    /// Where CSV exports are written
    pub export_dir: PathBuf,
    /// Override for the session token directory. `None` uses the
    /// per-login-session runtime directory.
    pub session_dir: Option<PathBuf>,
    /// Verbose logging to stderr
    pub debug: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            export_dir: PathBuf::from("."),
            session_dir: None,
            debug: false,
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend URL. Trailing slashes are dropped.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = Some(dir.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Defaults overlaid with any non-empty `CVEDASH_*` variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = env_non_empty(ENV_API_URL) {
            config = config.with_api_url(url);
        }
        if let Some(dir) = env_non_empty(ENV_EXPORT_DIR) {
            config = config.with_export_dir(dir);
        }
        if let Some(dir) = env_non_empty(ENV_SESSION_DIR) {
            config = config.with_session_dir(dir);
        }
        config
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
