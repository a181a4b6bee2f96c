//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, TokenStoragePort};

/// Handles user authentication workflow.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn TokenStoragePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
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

    /// Authenticates with the provided request.
    ///
    /// Storage is not touched; the caller persists the issued token with
    /// [`Self::store_token`] once it has ordered the write against other
    /// session changes.
    ///
    /// # Errors
    /// Returns error if credentials are empty or rejected, or the backend is unreachable.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        debug!(username = %request.username, "Attempting login");

        if request.username.is_empty() || request.password.is_empty() {
            warn!("Login attempted with empty credentials");
            return Err(AuthError::invalid_credentials(Some(
                "username and password are required".to_string(),
            )));
        }

        let grant = self
            .auth_port
            .login(&request.username, &request.password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Login rejected");
                e
            })?;

        info!(
            user_id = %grant.user.id(),
            username = %grant.user.username(),
            role = %grant.user.role(),
            "Successfully authenticated"
        );

        Ok(LoginResponse::new(grant.user, grant.token))
    }

    /// Persists the issued token, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if the token store rejects the write.
    pub async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        match self.storage_port.store_token(token).await {
            Ok(()) => {
                info!("Token persisted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist token");
                Err(e)
            }
        }
    }

    /// Deletes the stored token.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn delete_token(&self) -> Result<(), AuthError> {
        debug!("Deleting persisted token");
        match self.storage_port.delete_token().await {
            Ok(()) => {
                info!("Persisted token deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete persisted token");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::domain::ports::mocks::{MAIN_MANAGER_PASSWORD, MockAuthPort, MockTokenStorage};

    #[tokio::test]
    async fn test_successful_login() {
        let auth_port = Arc::new(MockAuthPort::new());
        let storage_port = Arc::new(MockTokenStorage::new());

        let use_case = LoginUseCase::new(auth_port, storage_port.clone());
        let request = LoginRequest::new("main_manager", MAIN_MANAGER_PASSWORD);

        let response = use_case.execute(request).await.unwrap();

        assert_eq!(response.user.username(), "main_manager");
        assert_eq!(response.user.role(), Role::SuperManager);
        assert!(storage_port.stored().await.is_none(), "execute only authenticates");

        use_case.store_token(&response.token).await.unwrap();
        assert_eq!(storage_port.stored().await, Some(response.token));
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_stored_token() {
        let previous = AuthToken::new_unchecked("mock_token_2_99");
        let auth_port = Arc::new(MockAuthPort::new());
        let storage_port = Arc::new(MockTokenStorage::with_token(previous.clone()));

        let use_case = LoginUseCase::new(auth_port, storage_port.clone());
        let result = use_case
            .execute(LoginRequest::new("main_manager", "wrong"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials { .. })));
        assert_eq!(storage_port.stored().await, Some(previous));
    }

    #[tokio::test]
    async fn test_empty_credentials_skip_backend() {
        let auth_port = Arc::new(MockAuthPort::new());
        auth_port.set_online(false);
        let use_case = LoginUseCase::new(auth_port, Arc::new(MockTokenStorage::new()));

        let result = use_case.execute(LoginRequest::new("", "")).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials { .. })));
    }

    #[tokio::test]
    async fn test_network_failure_is_surfaced() {
        let auth_port = Arc::new(MockAuthPort::new());
        auth_port.set_online(false);
        let use_case = LoginUseCase::new(auth_port, Arc::new(MockTokenStorage::new()));

        let result = use_case
            .execute(LoginRequest::new("manager", "password"))
            .await;

        assert!(matches!(result, Err(AuthError::NetworkError { .. })));
    }

    #[tokio::test]
    async fn test_delete_token() {
        let storage_port = Arc::new(MockTokenStorage::with_token(AuthToken::new_unchecked(
            "mock_token_2_3",
        )));
        let use_case = LoginUseCase::new(Arc::new(MockAuthPort::new()), storage_port.clone());

        use_case.delete_token().await.unwrap();

        assert!(!storage_port.has_token().await.unwrap());
        assert_eq!(storage_port.delete_count(), 1);
    }
}
