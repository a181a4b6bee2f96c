//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{AuthToken, LoginGrant, User};
use crate::domain::errors::AuthError;

/// Port for the backend's login and token verification endpoints.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges credentials for a token and the user profile.
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, AuthError>;

    /// Validates token and returns user information.
    async fn verify(&self, token: &AuthToken) -> Result<User, AuthError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::entities::Role;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    /// Password of the seeded `main_manager` account.
    pub const MAIN_MANAGER_PASSWORD: &str = "7\\gU%T$fVRt?pqB";

    struct Account {
        id: u64,
        username: &'static str,
        password: &'static str,
        role: Role,
    }

    const ACCOUNTS: [Account; 2] = [
        Account {
            id: 1,
            username: "main_manager",
            password: MAIN_MANAGER_PASSWORD,
            role: Role::SuperManager,
        },
        Account {
            id: 2,
            username: "manager",
            password: "password",
            role: Role::Manager,
        },
    ];

    /// In-memory backend with the two seeded manager accounts.
    ///
    /// Issued tokens look like `mock_token_<user id>_<serial>`.
    pub struct MockAuthPort {
        online: AtomicBool,
        serial: AtomicU64,
        verify_calls: AtomicU64,
    }

    impl MockAuthPort {
        /// Creates new mock.
        pub fn new() -> Self {
            Self {
                online: AtomicBool::new(true),
                serial: AtomicU64::new(0),
                verify_calls: AtomicU64::new(0),
            }
        }

        /// Simulates the backend being unreachable.
        pub fn set_online(&self, value: bool) {
            self.online.store(value, Ordering::SeqCst);
        }

        /// Number of verification round-trips made so far.
        pub fn verify_calls(&self) -> u64 {
            self.verify_calls.load(Ordering::SeqCst)
        }

        fn user_of(account: &Account) -> User {
            User::new(account.id, account.username, account.role)
        }
    }

    impl Default for MockAuthPort {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl AuthPort for MockAuthPort {
        async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, AuthError> {
            if !self.online.load(Ordering::SeqCst) {
                return Err(AuthError::network("connection refused"));
            }

            let account = ACCOUNTS
                .iter()
                .find(|a| a.username == username && a.password == password)
                .ok_or_else(|| {
                    AuthError::invalid_credentials(Some("invalid username or password".into()))
                })?;

            let serial = self.serial.fetch_add(1, Ordering::SeqCst);
            let token = AuthToken::new_unchecked(format!("mock_token_{}_{serial}", account.id));
            Ok(LoginGrant::new(token, Self::user_of(account)))
        }

        async fn verify(&self, token: &AuthToken) -> Result<User, AuthError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            if !self.online.load(Ordering::SeqCst) {
                return Err(AuthError::network("connection refused"));
            }

            let user_id = token
                .as_str()
                .strip_prefix("mock_token_")
                .and_then(|rest| rest.split('_').next())
                .and_then(|id| id.parse::<u64>().ok())
                .ok_or_else(|| AuthError::invalid_token("malformed token"))?;

            ACCOUNTS
                .iter()
                .find(|a| a.id == user_id)
                .map(Self::user_of)
                .ok_or_else(|| AuthError::invalid_token("unknown user"))
        }
    }
}
