use async_trait::async_trait;

use crate::config::AUTH_BACKEND_URL;

use super::errors::BackendError;
use super::types::{Profile, TokenExchangeRejection};

/// Client side of the backend's two auth endpoints.
#[async_trait]
pub trait ProfileBackend: Send + Sync + 'static {
    /// Fetch the application profile for the identity the bearer token names.
    async fn fetch_profile(&self, bearer_token: &str) -> Result<Profile, BackendError>;

    /// Hand a provider id token to the backend so it can establish its own
    /// cookie-based session.
    async fn exchange_id_token(&self, id_token: &str) -> Result<(), BackendError>;
}

/// [`ProfileBackend`] over plain HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        // The cookie store carries the backend session cookie set by the
        // token exchange into subsequent requests.
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Construct against the URL in the `AUTH_BACKEND_URL` environment
    /// variable.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(AUTH_BACKEND_URL.as_str())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl ProfileBackend for HttpBackend {
    async fn fetch_profile(&self, bearer_token: &str) -> Result<Profile, BackendError> {
        let response = self
            .client
            .get(self.url("/auth/profile"))
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Profile fetch returned status {}", status);
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let profile: Profile = serde_json::from_str(&body)
            .map_err(|e| BackendError::Serde(format!("Failed to deserialize profile body: {e}")))?;

        tracing::debug!("Profile fields: {:?}", profile.keys().collect::<Vec<_>>());
        Ok(profile)
    }

    async fn exchange_id_token(&self, id_token: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url("/auth/token"))
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        // Prefer the backend's own error message when the body carries one.
        match serde_json::from_str::<TokenExchangeRejection>(&body) {
            Ok(rejection) => Err(BackendError::Rejected(rejection.error)),
            Err(_) => Err(BackendError::Status(status.as_u16())),
        }
    }
}
