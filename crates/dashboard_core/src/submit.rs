use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::JobId;

/// Webhook used until the user configures another one.
pub const DEFAULT_WEBHOOK_URL: &str = "https://hook.eu2.make.com/wox5dmw6fbgunazmmya2hahi369rolbb";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please provide a website URL")]
    EmptyUrl,
    #[error("Please enter a valid website URL ({0})")]
    InvalidUrl(String),
    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

/// A website URL that parsed as absolute and carries a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    pub url: String,
    pub host: String,
}

pub fn validate_website_url(raw: &str) -> Result<ValidatedUrl, SubmitError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::EmptyUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|err| SubmitError::InvalidUrl(err.to_string()))?;
    let host = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| SubmitError::InvalidUrl("missing host".to_string()))?;
    Ok(ValidatedUrl {
        url: trimmed.to_string(),
        host: host.to_string(),
    })
}

/// Hostname of `url`, or `None` when it does not parse.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(ToOwned::to_owned))
}

/// ISO 8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetOptions {
    pub capture_images: bool,
    pub capture_logo: bool,
    pub max_images: u32,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            capture_images: true,
            capture_logo: true,
            max_images: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputOptions {
    pub create_google_doc: bool,
    pub include_benefits: bool,
    pub include_matched_benefits: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            create_google_doc: true,
            include_benefits: true,
            include_matched_benefits: true,
        }
    }
}

/// JSON body posted to the automation webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub job_id: JobId,
    pub website_url: String,
    pub website_host: String,
    pub run_folder_hint: String,
    pub assets: AssetOptions,
    pub outputs: OutputOptions,
    pub timestamp: String,
}

impl WebhookPayload {
    pub fn new(job_id: JobId, target: &ValidatedUrl, now: DateTime<Utc>) -> Self {
        let timestamp = iso_timestamp(now);
        Self {
            job_id,
            website_url: target.url.clone(),
            website_host: target.host.clone(),
            run_folder_hint: format!("AUTO_EMP_{}_{}", target.host, timestamp),
            assets: AssetOptions::default(),
            outputs: OutputOptions::default(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    pub endpoint: String,
    pub payload: WebhookPayload,
}
