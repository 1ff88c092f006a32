use super::{ApiClient, ApiError, AuthResponse, Credentials, Registration};
use reqwest::Method;

/// `/auth/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/register/`
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let builder = self
            .client
            .request(Method::POST, "/auth/register/")
            .json(registration);
        ApiClient::send(builder).await
    }

    /// `POST /auth/login/`
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let builder = self
            .client
            .request(Method::POST, "/auth/login/")
            .json(credentials);
        ApiClient::send(builder).await
    }
}
