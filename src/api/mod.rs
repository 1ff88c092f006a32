//! HTTP client for the movie rating backend.
//!
//! [`ApiClient`] holds the base address and the bearer token of the active
//! session. Calls are grouped by resource: [`ApiClient::auth`],
//! [`ApiClient::movies`] and [`ApiClient::ratings`]. Failures are surfaced to
//! the caller as [`ApiError`]; nothing is retried.

mod auth;
mod models;
mod movies;
mod ratings;

#[cfg(test)]
pub(crate) mod test_server;

pub use auth::AuthApi;
pub use models::*;
pub use movies::MoviesApi;
pub use ratings::RatingsApi;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Errors from the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, TLS) or the
    /// body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx status. `body` is the raw response text.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("could not read poster file {}: {source}", .path.display())]
    Poster {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ApiError::Poster { .. } => None,
        }
    }

    fn body_json(&self) -> Option<Value> {
        match self {
            ApiError::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Text under `field` in a JSON error body, e.g. `{"error": "..."}`.
    /// List values yield their first entry.
    pub fn field_message(&self, field: &str) -> Option<String> {
        let body = self.body_json()?;
        value_text(body.get(field)?)
    }

    /// Flattens a validation map such as `{"username": ["taken"]}` into
    /// `"username: taken"`, one entry per field joined by `"; "`.
    pub fn validation_summary(&self) -> Option<String> {
        let body = self.body_json()?;
        let map = body.as_object()?;
        let parts: Vec<String> = map
            .iter()
            .filter_map(|(key, value)| {
                let text = value_text(value)?;
                Some(if key == "non_field_errors" || key == "detail" {
                    text
                } else {
                    format!("{key}: {text}")
                })
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(value_text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Cloneable handle to the backend; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ApiClient {
    /// * `base_url` - API root, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            access_token: None,
        }
    }

    /// A copy of this client that sends `token` as its bearer credential.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            access_token: token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn movies(&self) -> MoviesApi<'_> {
        MoviesApi::new(self)
    }

    pub fn ratings(&self) -> RatingsApi<'_> {
        RatingsApi::new(self)
    }

    // ---- private helpers ----

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, authenticated = self.access_token.is_some(), "api request");
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode a JSON response body.
    pub(crate) async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::ensure_success(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and discard the response body.
    pub(crate) async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::ensure_success(builder.send().await?).await?;
        Ok(())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "api response");
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(ApiError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(body: &str) -> ApiError {
        ApiError::Api {
            status: 400,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_field_message_reads_string_and_list() {
        assert_eq!(
            api_error(r#"{"error": "Invalid credentials"}"#).field_message("error"),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(
            api_error(r#"{"message": ["Title required", "x"]}"#).field_message("message"),
            Some("Title required".to_string())
        );
        assert_eq!(api_error("not json").field_message("error"), None);
        assert_eq!(ApiError::NotFound.field_message("error"), None);
    }

    #[test]
    fn test_validation_summary_flattens_fields() {
        let err = api_error(
            r#"{"password": ["Password fields didn't match."], "non_field_errors": ["Bad input"]}"#,
        );
        let summary = err.validation_summary().unwrap();
        assert!(summary.contains("password: Password fields didn't match."));
        assert!(summary.contains("Bad input"));
        assert!(!summary.contains("non_field_errors"));
        assert_eq!(api_error("{}").validation_summary(), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.status(), Some(404));
        assert_eq!(api_error("{}").status(), Some(400));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_bearer_header_only_with_token() {
        let client = ApiClient::new("http://localhost:8000/api");
        let request = client.request(Method::GET, "/movies/").build().unwrap();
        assert!(request.headers().get("authorization").is_none());

        let client = client.with_token(Some("abc".into()));
        let request = client.request(Method::GET, "/movies/").build().unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer abc");
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/movies/");
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_request_error() {
        // Nothing listens on port 9 of the loopback interface.
        let client = ApiClient::new("http://127.0.0.1:9/api");
        let err = client.movies().get(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }
}
