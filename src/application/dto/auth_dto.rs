//! Authentication DTOs.

use zeroize::Zeroizing;

use crate::domain::entities::{AuthToken, User};

/// Login request data.
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Password, wiped from memory on drop.
    pub password: Zeroizing<String>,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Authenticated user.
    pub user: User,
    /// Issued bearer token.
    pub token: AuthToken,
}

impl LoginResponse {
    /// Creates new login response.
    #[must_use]
    pub const fn new(user: User, token: AuthToken) -> Self {
        Self { user, token }
    }
}
