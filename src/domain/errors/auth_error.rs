//! Authentication error types.

use thiserror::Error;

/// Message shown when the backend rejects a login without saying why.
pub const GENERIC_LOGIN_FAILURE: &str = "login failed";

/// Authentication error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Login rejected; the message is shown to the user as-is.
    #[error("{message}")]
    InvalidCredentials {
        /// Backend message or the generic fallback.
        message: String,
    },

    /// Token rejected by the backend.
    #[error("token rejected by backend: {message}")]
    InvalidToken {
        /// Reason for the rejection.
        message: String,
    },

    /// Token storage could not be read.
    #[error("failed to retrieve stored token: {message}")]
    TokenRetrievalFailed {
        /// Storage error.
        message: String,
    },

    /// Token storage could not be written or cleared.
    #[error("failed to store token: {message}")]
    TokenStorageFailed {
        /// Storage error.
        message: String,
    },

    /// Backend unreachable.
    #[error("network error during authentication: {message}")]
    NetworkError {
        /// Transport error.
        message: String,
    },

    /// Backend failed with a server-side status.
    #[error("backend error {status}: {message}")]
    Backend {
        /// HTTP status.
        status: u16,
        /// Backend message.
        message: String,
    },

    /// Anything else.
    #[error("unexpected authentication error: {message}")]
    Unexpected {
        /// Error description.
        message: String,
    },
}

impl AuthError {
    /// Creates invalid credentials error, falling back to the generic message.
    #[must_use]
    pub fn invalid_credentials(message: Option<String>) -> Self {
        Self::InvalidCredentials {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string()),
        }
    }

    /// Creates invalid token error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates backend error.
    #[must_use]
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates retrieval failed error.
    #[must_use]
    pub fn retrieval_failed(message: impl Into<String>) -> Self {
        Self::TokenRetrievalFailed {
            message: message.into(),
        }
    }

    /// Creates storage failed error.
    #[must_use]
    pub fn storage_failed(message: impl Into<String>) -> Self {
        Self::TokenStorageFailed {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }
}
