//! Manager account DTOs.

use zeroize::Zeroizing;

use crate::domain::entities::{Role, User};

/// Password generated by the backend for a manager account.
pub struct PasswordReset {
    /// Generated password, shown once.
    pub password: Zeroizing<String>,
}

impl PasswordReset {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordReset")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request for a new manager account; the backend picks the password.
#[derive(Debug, Clone)]
pub struct NewManager {
    /// Login name, trimmed.
    pub username: String,
    /// Account role.
    pub role: Role,
}

impl NewManager {
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into().trim().to_string(),
            role,
        }
    }
}

/// Freshly created manager together with its initial password.
pub struct CreatedManager {
    /// Created account.
    pub user: User,
    /// Initial password, shown once.
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for CreatedManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedManager")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
