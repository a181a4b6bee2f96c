//! Infrastructure layer with external service adapters.

/// REST backend client.
pub mod backend;
/// Application configuration.
pub mod config;
/// Token storage adapters.
pub mod storage;

pub use backend::{BackendClient, DEFAULT_API_URL};
pub use config::{AppConfig, CliArgs, Command, LogLevel, StorageManager, TokenStoreKind};
pub use storage::{FileTokenStorage, MemoryTokenStorage, build_token_storage};
#[cfg(feature = "keyring")]
pub use storage::KeyringTokenStorage;
