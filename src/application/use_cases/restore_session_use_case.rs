//! Restores a session from a persisted token.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{AuthToken, User};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, TokenStoragePort};

/// Loads the persisted token and checks it with the backend.
pub struct RestoreSessionUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn TokenStoragePort>,
}

impl RestoreSessionUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn TokenStoragePort>,
    ) -> Self {
        Self {
            auth_port,
            storage_port,
        }
    }

    /// Returns the persisted token, if any.
    ///
    /// Unreadable storage is treated as having no token.
    pub async fn load_token(&self) -> Option<AuthToken> {
        debug!("Checking storage for persisted token");
        match self.storage_port.get_token().await {
            Ok(Some(token)) => {
                debug!(token = %token, "Found persisted token");
                Some(token)
            }
            Ok(None) => {
                debug!("No persisted token");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read token storage");
                None
            }
        }
    }

    /// Verifies `token` against the backend.
    ///
    /// # Errors
    /// Returns the verification failure; the caller decides whether to discard the token.
    pub async fn verify(&self, token: &AuthToken) -> Result<User, AuthError> {
        match self.auth_port.verify(token).await {
            Ok(user) => {
                info!(user_id = %user.id(), username = %user.username(), "Session restored");
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Persisted token failed verification");
                Err(e)
            }
        }
    }

    /// Removes the persisted token, logging failures.
    pub async fn discard(&self) {
        if let Err(e) = self.storage_port.delete_token().await {
            warn!(error = %e, "Failed to discard persisted token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockAuthPort, MockTokenStorage};

    #[tokio::test]
    async fn test_load_and_verify() {
        let storage = Arc::new(MockTokenStorage::with_token(AuthToken::new_unchecked(
            "mock_token_1_0",
        )));
        let use_case = RestoreSessionUseCase::new(Arc::new(MockAuthPort::new()), storage);

        let token = use_case.load_token().await.unwrap();
        let user = use_case.verify(&token).await.unwrap();

        assert_eq!(user.username(), "main_manager");
    }

    #[tokio::test]
    async fn test_no_token() {
        let use_case = RestoreSessionUseCase::new(
            Arc::new(MockAuthPort::new()),
            Arc::new(MockTokenStorage::new()),
        );

        assert!(use_case.load_token().await.is_none());
    }

    #[tokio::test]
    async fn test_discard_clears_storage() {
        let storage = Arc::new(MockTokenStorage::with_token(AuthToken::new_unchecked("x")));
        let use_case = RestoreSessionUseCase::new(Arc::new(MockAuthPort::new()), storage.clone());

        use_case.discard().await;

        assert!(storage.stored().await.is_none());
    }
}
