//! Errors of authorized backend calls.

use thiserror::Error;

/// Message used when a failed response carries no `error` field.
pub const GENERIC_REQUEST_FAILURE: &str = "request failed";

/// Single field complaint from a validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field name.
    pub field: String,
    /// Complaint about the field.
    pub message: String,
}

/// Failure of an authorized request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered 401; the session has already been torn down.
    #[error("not authorized")]
    Unauthorized,

    /// 404.
    #[error("not found: {message}")]
    NotFound {
        /// Backend message.
        message: String,
    },

    /// 400 or 422 with optional per-field complaints.
    #[error("validation failed: {message}")]
    Validation {
        /// Backend message.
        message: String,
        /// Per-field complaints, possibly empty.
        fields: Vec<FieldError>,
    },

    /// Any other non-success status.
    #[error("backend error {status}: {message}")]
    Server {
        /// HTTP status.
        status: u16,
        /// Backend message.
        message: String,
    },

    /// Request never got a response.
    #[error("network error: {message}")]
    Network {
        /// Transport error.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder error.
        message: String,
    },
}

impl ApiError {
    /// Classifies a non-success status and its parsed error body.
    #[must_use]
    pub fn from_status(status: u16, message: Option<String>, fields: Vec<FieldError>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string());

        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound { message },
            400 | 422 => Self::Validation { message, fields },
            _ => Self::Server { status, message },
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether the session was torn down by this failure.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(401, "Unauthorized" ; "unauthorized")]
    #[test_case(404, "NotFound" ; "not_found")]
    #[test_case(400, "Validation" ; "bad_request")]
    #[test_case(422, "Validation" ; "unprocessable")]
    #[test_case(409, "Server" ; "conflict")]
    #[test_case(503, "Server" ; "unavailable")]
    fn test_from_status(status: u16, expected: &str) {
        let err = ApiError::from_status(status, Some("boom".to_string()), Vec::new());
        let kind = format!("{err:?}");
        assert!(kind.starts_with(expected), "{kind}");
    }

    #[test]
    fn test_generic_message() {
        let err = ApiError::from_status(500, None, Vec::new());
        assert_eq!(err.to_string(), "backend error 500: request failed");
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::network("reset").is_retryable());
        assert!(ApiError::from_status(502, None, Vec::new()).is_retryable());
        assert!(!ApiError::from_status(404, None, Vec::new()).is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
    }
}
