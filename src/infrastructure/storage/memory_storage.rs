//! Process-local token storage.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStoragePort;

/// Keeps the token for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStoragePort for MemoryTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
        Ok(self.token.lock().clone())
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), AuthError> {
        self.token.lock().take();
        Ok(())
    }
}
