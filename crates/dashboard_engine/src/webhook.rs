use std::time::Duration;

use dashboard_core::{fallback_payload, interpret_response, WebhookOutcome, WebhookRequest};
use dashboard_logging::{dash_debug, dash_warn};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub user_agent: String,
    /// `None` keeps the HTTP client's default (no overall deadline).
    pub request_timeout: Option<Duration>,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("profile-dashboard/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid webhook endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to encode webhook payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for WebhookError {
    fn from(err: reqwest::Error) -> Self {
        WebhookError::Transport(err.to_string())
    }
}

/// Single-attempt delivery of a job to the automation webhook.
#[async_trait::async_trait]
pub trait WebhookClient: Send + Sync {
    async fn deliver(&self, request: &WebhookRequest) -> WebhookOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestWebhookClient {
    settings: WebhookSettings,
}

impl ReqwestWebhookClient {
    pub fn new(settings: WebhookSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, WebhookError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    async fn post(&self, request: &WebhookRequest) -> Result<WebhookOutcome, WebhookError> {
        let endpoint = reqwest::Url::parse(&request.endpoint).map_err(|err| {
            WebhookError::InvalidEndpoint {
                endpoint: request.endpoint.clone(),
                reason: err.to_string(),
            }
        })?;
        let body = serde_json::to_vec(&request.payload)?;
        let client = self.build_client()?;

        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.settings.user_agent.as_str())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let job_id = request.payload.job_id.as_str();
        let website_url = request.payload.website_url.as_str();
        match response.text().await {
            Ok(text) => Ok(interpret_response(
                job_id,
                website_url,
                status.as_u16(),
                content_type.as_deref(),
                &text,
            )),
            // A 2xx whose body could not be read still counts as delivered.
            Err(err) if status.is_success() => {
                dash_warn!("Could not read webhook body for {}: {}", job_id, err);
                Ok(WebhookOutcome::Completed(fallback_payload(job_id, website_url)))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait::async_trait]
impl WebhookClient for ReqwestWebhookClient {
    async fn deliver(&self, request: &WebhookRequest) -> WebhookOutcome {
        dash_debug!(
            "POST {} for {}",
            request.endpoint,
            request.payload.job_id
        );
        match self.post(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                dash_warn!("Webhook call for {} failed: {}", request.payload.job_id, err);
                WebhookOutcome::failed(err.to_string())
            }
        }
    }
}
