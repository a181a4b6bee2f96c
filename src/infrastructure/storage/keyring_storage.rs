//! Keyring-based token storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::{TOKEN_STORAGE_KEY, TokenStoragePort};

const KEYRING_SERVICE: &str = "estate-admin";

/// System keyring token storage adapter.
///
/// Platform keyring calls block, so each one runs on the blocking pool.
#[derive(Clone)]
pub struct KeyringTokenStorage {
    service: String,
    user: String,
}

impl KeyringTokenStorage {
    /// Creates storage under the application service and the `authToken` key.
    #[must_use]
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, TOKEN_STORAGE_KEY)
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    async fn with_entry<T, F>(&self, op: F) -> Result<T, AuthError>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> Result<T, AuthError> + Send + 'static,
    {
        let (service, user) = (self.service.clone(), self.user.clone());
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &user).map_err(|e| {
                AuthError::retrieval_failed(format!("failed to access keyring: {e}"))
            })?;
            op(entry)
        })
        .await
        .map_err(|e| AuthError::unexpected(format!("keyring task failed: {e}")))?
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStoragePort for KeyringTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
        debug!(service = %self.service, "Retrieving token from keyring");

        self.with_entry(|entry| match entry.get_password() {
            Ok(secret) => {
                let token = AuthToken::new(secret);
                if token.is_none() {
                    warn!("Keyring entry holds no usable token");
                }
                Ok(token)
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(error = %e, "Failed to retrieve token from keyring");
                Err(AuthError::retrieval_failed(e.to_string()))
            }
        })
        .await
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        debug!(service = %self.service, "Storing token in keyring");

        let secret = token.as_str().to_string();
        self.with_entry(move |entry| {
            entry.set_password(&secret).map_err(|e| {
                warn!(error = %e, "Failed to store token in keyring");
                AuthError::storage_failed(e.to_string())
            })
        })
        .await
    }

    async fn delete_token(&self) -> Result<(), AuthError> {
        debug!(service = %self.service, "Deleting token from keyring");

        self.with_entry(|entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to delete token from keyring");
                Err(AuthError::storage_failed(e.to_string()))
            }
        })
        .await
    }
}
