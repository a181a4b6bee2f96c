//! Back-office REST backend HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};
use tracing::{debug, warn};

use super::dto::{ErrorBody, LoginBody, LoginResponseBody, VerifyResponseBody};
use crate::domain::entities::{AuthToken, LoginGrant, User};
use crate::domain::errors::{ApiError, AuthError};
use crate::domain::ports::{ApiRequest, ApiResponse, AuthPort, HttpMethod, TransportPort};

/// Base URL of a locally running backend, `/api` prefix included.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

const USER_AGENT: &str = concat!("estate-admin/", env!("CARGO_PKG_VERSION"));

/// HTTP adapter for the transport and auth ports.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates client with the default base URL and a 30 second timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_API_URL, Duration::from_secs(30))
    }

    /// Creates client for `base_url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn raw(&self, request: ApiRequest) -> Result<ApiResponse, reqwest::Error> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, self.url(&request.path))
            .header(header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.header(header::AUTHORIZATION, token.bearer_header());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(ApiResponse::new(status, body))
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "failed to connect to backend".to_string()
    } else {
        e.to_string()
    }
}

/// Maps a rejected login: 4xx is a credential problem, anything else is the backend's.
fn login_failure(response: &ApiResponse) -> AuthError {
    let message = response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.trim().is_empty());

    match StatusCode::from_u16(response.status()) {
        Ok(status) if status.is_client_error() => AuthError::invalid_credentials(message),
        _ => AuthError::backend(
            response.status(),
            message.unwrap_or_else(|| format!("HTTP {}", response.status())),
        ),
    }
}

fn parse_grant(response: &ApiResponse) -> Result<LoginGrant, AuthError> {
    let body: LoginResponseBody = response
        .json()
        .map_err(|e| AuthError::unexpected(format!("failed to parse login response: {e}")))?;
    let token = AuthToken::new(body.token)
        .ok_or_else(|| AuthError::unexpected("backend issued an empty token"))?;
    Ok(LoginGrant::new(token, body.user))
}

fn parse_verified(response: &ApiResponse) -> Result<User, AuthError> {
    if !response.is_success() {
        return Err(AuthError::invalid_token(format!(
            "verification returned {}",
            response.status()
        )));
    }
    response
        .json::<VerifyResponseBody>()
        .map(|body| body.user)
        .map_err(|e| AuthError::invalid_token(format!("malformed verify response: {e}")))
}

#[async_trait]
impl TransportPort for BackendClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (method, path) = (request.method, request.path.clone());
        let response = self.raw(request).await.map_err(|e| {
            warn!(error = %e, %method, %path, "Backend request failed");
            ApiError::network(describe(&e))
        })?;
        debug!(%method, %path, status = response.status(), "Backend responded");
        Ok(response)
    }
}

#[async_trait]
impl AuthPort for BackendClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, AuthError> {
        debug!(%username, "Submitting credentials");
        let body = serde_json::to_value(LoginBody { username, password })
            .map_err(|e| AuthError::unexpected(e.to_string()))?;

        let response = self
            .raw(ApiRequest::post("auth/login", body))
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach login endpoint");
                AuthError::network(describe(&e))
            })?;

        if response.is_success() {
            parse_grant(&response)
        } else {
            Err(login_failure(&response))
        }
    }

    async fn verify(&self, token: &AuthToken) -> Result<User, AuthError> {
        debug!(token = %token, "Verifying token");
        let response = self
            .raw(ApiRequest::get("auth/verify").with_bearer(token.clone()))
            .await
            .map_err(|e| AuthError::network(describe(&e)))?;

        parse_verified(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::domain::errors::GENERIC_LOGIN_FAILURE;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_client_creation() {
        let client =
            BackendClient::with_base_url("http://example.test/api/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "http://example.test/api");
        assert_eq!(client.url("/houses"), "http://example.test/api/houses");
        assert_eq!(
            BackendClient::new().unwrap().url("auth/login"),
            "http://localhost:3000/api/auth/login"
        );
    }

    #[test]
    fn test_login_failure_uses_backend_message() {
        let response =
            ApiResponse::json_value(401, &json!({"error": "Неверный логин или пароль"}));
        let err = login_failure(&response);

        assert_eq!(err.to_string(), "Неверный логин или пароль");
    }

    #[test_case(400, "" ; "empty_body")]
    #[test_case(401, "{}" ; "no_error_field")]
    #[test_case(403, r#"{"error": ""}"# ; "blank_error")]
    fn test_login_failure_generic_message(status: u16, body: &'static str) {
        let err = login_failure(&ApiResponse::new(status, body));
        assert_eq!(err, AuthError::invalid_credentials(None));
        assert_eq!(err.to_string(), GENERIC_LOGIN_FAILURE);
    }

    #[test]
    fn test_login_server_error_is_not_credentials() {
        let err = login_failure(&ApiResponse::json_value(500, &json!({"error": "db down"})));
        assert!(matches!(err, AuthError::Backend { status: 500, .. }));
    }

    #[test]
    fn test_parse_grant() {
        let response = ApiResponse::json_value(
            200,
            &json!({
                "token": "abc.def.ghi",
                "user": {"id": 1, "username": "main_manager", "role": "super_manager"}
            }),
        );
        let grant = parse_grant(&response).unwrap();

        assert_eq!(grant.token.as_str(), "abc.def.ghi");
        assert_eq!(grant.user.role(), Role::SuperManager);
        let blank = ApiResponse::json_value(
            200,
            &json!({"token": "", "user": {"id": 1, "username": "x"}}),
        );
        assert!(parse_grant(&blank).is_err());
    }

    #[test_case(200, r#"{"user": {"id": "2", "username": "manager", "role": "manager"}}"#, true ; "ok")]
    #[test_case(401, r#"{"error": "expired"}"#, false ; "unauthorized")]
    #[test_case(200, "not json", false ; "malformed")]
    fn test_parse_verified(status: u16, body: &'static str, ok: bool) {
        let result = parse_verified(&ApiResponse::new(status, body));
        assert_eq!(result.is_ok(), ok);
        if let Err(e) = result {
            assert!(matches!(e, AuthError::InvalidToken { .. }));
        }
    }
}
