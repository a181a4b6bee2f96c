//! Token storage port definition.

use async_trait::async_trait;

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;

/// Storage key under which the bearer token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "authToken";

/// Port for token persistence operations.
#[async_trait]
pub trait TokenStoragePort: Send + Sync {
    /// Retrieves stored token.
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError>;

    /// Stores token, replacing any previous one.
    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError>;

    /// Deletes stored token. Deleting a missing token succeeds.
    async fn delete_token(&self) -> Result<(), AuthError>;

    /// Checks if token exists.
    async fn has_token(&self) -> Result<bool, AuthError> {
        Ok(self.get_token().await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{RwLock, Semaphore};

    /// Mock token storage for testing.
    pub struct MockTokenStorage {
        token: Arc<RwLock<Option<AuthToken>>>,
        deletes: AtomicUsize,
        delete_gate: Option<Arc<Semaphore>>,
    }

    impl MockTokenStorage {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self {
                token: Arc::new(RwLock::new(None)),
                deletes: AtomicUsize::new(0),
                delete_gate: None,
            }
        }

        /// Creates mock storage with token.
        pub fn with_token(token: AuthToken) -> Self {
            Self {
                token: Arc::new(RwLock::new(Some(token))),
                deletes: AtomicUsize::new(0),
                delete_gate: None,
            }
        }

        /// Holds every delete until `gate` hands out a permit.
        pub fn with_delete_gate(mut self, gate: Arc<Semaphore>) -> Self {
            self.delete_gate = Some(gate);
            self
        }

        /// Current stored value.
        pub async fn stored(&self) -> Option<AuthToken> {
            self.token.read().await.clone()
        }

        /// Number of delete calls received.
        pub fn delete_count(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
        }
    }

    impl Default for MockTokenStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl TokenStoragePort for MockTokenStorage {
        async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
            Ok(self.token.read().await.clone())
        }

        async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
            *self.token.write().await = Some(token.clone());
            Ok(())
        }

        async fn delete_token(&self) -> Result<(), AuthError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.delete_gate {
                gate.acquire()
                    .await
                    .map_err(|e| AuthError::unexpected(e.to_string()))?
                    .forget();
            }
            *self.token.write().await = None;
            Ok(())
        }
    }
}
