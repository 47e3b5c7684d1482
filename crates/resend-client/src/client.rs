//! Resend HTTP client.

use crate::error::ResendError;
use crate::types::{SendEmailRequest, SendEmailResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Client for the Resend transactional email API.
#[derive(Clone)]
pub struct ResendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ResendClient {
    /// Create a new client against the production API.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ResendError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint (used by tests).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ResendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Send a single email.
    #[instrument(skip(self, request), fields(subject = %request.subject))]
    pub async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, ResendError> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%status, "Resend rejected the request");
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendEmailResponse = response.json().await?;
        debug!(id = %sent.id, "Email accepted by Resend");
        Ok(sent)
    }
}
