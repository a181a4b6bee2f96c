//! Token storage adapters.

mod file_storage;
#[cfg(feature = "keyring")]
mod keyring_storage;
mod memory_storage;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

pub use file_storage::FileTokenStorage;
#[cfg(feature = "keyring")]
pub use keyring_storage::KeyringTokenStorage;
pub use memory_storage::MemoryTokenStorage;

use crate::domain::ports::TokenStoragePort;
use crate::infrastructure::config::TokenStoreKind;

/// Builds the configured token store; `data_dir` holds the token file.
#[must_use]
pub fn build_token_storage(kind: TokenStoreKind, data_dir: &Path) -> Arc<dyn TokenStoragePort> {
    info!(store = ?kind, "Using token storage");
    match kind {
        #[cfg(feature = "keyring")]
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStorage::new()),
        #[cfg(not(feature = "keyring"))]
        TokenStoreKind::Keyring => {
            tracing::warn!("Built without keyring support, falling back to file storage");
            Arc::new(FileTokenStorage::in_dir(data_dir))
        }
        TokenStoreKind::File => Arc::new(FileTokenStorage::in_dir(data_dir)),
        TokenStoreKind::Memory => Arc::new(MemoryTokenStorage::new()),
    }
}
