//! Session state exposed by the session guard.

use super::{AuthToken, User};

/// Where the client stands with respect to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No usable credential.
    #[default]
    Unauthenticated,
    /// A persisted token is being checked against the backend.
    Verifying,
    /// A verified token is attached to every authorized request.
    Authenticated,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Verifying => write!(f, "verifying"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Bearer token while authenticated.
    pub token: Option<AuthToken>,
    /// Signed-in user.
    pub user: Option<User>,
    /// Authentication state.
    pub status: SessionStatus,
}

impl Session {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticated)
    }
}

/// Credential and profile returned by a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// Issued bearer token.
    pub token: AuthToken,
    pub user: User,
}

impl LoginGrant {
    #[must_use]
    pub const fn new(token: AuthToken, user: User) -> Self {
        Self { token, user }
    }
}
