//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{AppConfig, LogLevel, TokenStoreKind};
pub use args::{CatalogTabArg, CliArgs, Command, ListArgs, RoleArg};
pub use storage::{ConfigError, StorageManager};
