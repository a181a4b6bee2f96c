//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::application::services::DEFAULT_PAGE_SIZE;
use crate::infrastructure::backend::DEFAULT_API_URL;

pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "estate";
pub(crate) const APP_NAME: &str = "estate-admin";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

/// Where the bearer token is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// System keyring.
    Keyring,
    /// File in the application data directory.
    File,
    /// Not persisted; every run starts signed out.
    Memory,
}

impl Default for TokenStoreKind {
    fn default() -> Self {
        if cfg!(feature = "keyring") {
            Self::Keyring
        } else {
            Self::File
        }
    }
}

/// Application configuration, from `config.toml` overlaid with CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Backend base URL, `/api` prefix included.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Rows requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where the session token is kept.
    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// Log verbosity when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path; logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(api_url) = &args.api_url {
            self.api_url.clone_from(api_url);
        }
        if let Some(page_size) = args.page_size {
            self.page_size = page_size;
        }
        if let Some(timeout) = args.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(token_store) = args.token_store {
            self.token_store = token_store;
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
    }

    /// Page size, never zero.
    #[must_use]
    pub fn effective_page_size(&self) -> u64 {
        self.page_size.max(1)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("estate-admin.log"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            api_url: default_api_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            token_store: TokenStoreKind::default(),
            log_level: LogLevel::Info,
            log_path: None,
        }
    }
}
