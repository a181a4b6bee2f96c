//! HTTP transport port.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::entities::AuthToken;
use crate::domain::errors::{ApiError, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Request to the backend, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path below the base URL, without leading slash.
    pub path: String,
    /// Query parameters in send order.
    pub query: Vec<(String, String)>,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Value>,
    /// Bearer credential; `None` leaves the request unauthenticated.
    pub bearer: Option<AuthToken>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into().trim_start_matches('/').to_string(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn with_bearer(mut self, token: AuthToken) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// Raw backend response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: Bytes,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body.
    #[must_use]
    pub fn json_value(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decodes the body; an empty body decodes as JSON `null`.
    ///
    /// # Errors
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let raw: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(raw).map_err(|e| ApiError::decode(e.to_string()))
    }

    /// `error` message and field errors of a failed response, when present.
    #[must_use]
    pub fn error_details(&self) -> (Option<String>, Vec<FieldError>) {
        let Ok(value) = serde_json::from_slice::<Value>(&self.body) else {
            return (None, Vec::new());
        };

        let message = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let fields = match value.get("errors") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(field, message)| FieldError {
                    field: field.clone(),
                    message: message
                        .as_str()
                        .map_or_else(|| message.to_string(), str::to_string),
                })
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| {
                    let field = ["field", "path", "param"]
                        .iter()
                        .find_map(|k| item.get(*k).and_then(Value::as_str))?;
                    let message = ["message", "msg"]
                        .iter()
                        .find_map(|k| item.get(*k).and_then(Value::as_str))
                        .unwrap_or_default();
                    Some(FieldError {
                        field: field.to_string(),
                        message: message.to_string(),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        (message, fields)
    }

    /// Converts a failed response into the matching [`ApiError`].
    #[must_use]
    pub fn into_error(self) -> ApiError {
        let (message, fields) = self.error_details();
        ApiError::from_status(self.status, message, fields)
    }
}

/// Port for sending requests to the backend.
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// Sends the request. Only transport failures are errors; every HTTP
    /// status, including 401, comes back as a response.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}
