use dashboard_logging::{dash_debug, dash_warn};
use serde_json::{json, Value};

/// Maximum number of body characters kept in a failure summary.
pub const ERROR_BODY_LIMIT: usize = 100;

pub const FALLBACK_COMPANY_NAME: &str = "Processing Complete";

/// How a webhook call ended, as far as the job is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    Completed(Value),
    Failed { message: String },
}

impl WebhookOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        WebhookOutcome::Failed {
            message: message.into(),
        }
    }
}

/// Minimal success payload used when the webhook answers with something
/// other than parseable JSON.
pub fn fallback_payload(job_id: &str, website_url: &str) -> Value {
    json!({
        "success": true,
        "job_id": job_id,
        "status": "completed",
        "results": {
            "company_name": FALLBACK_COMPANY_NAME,
            "website": website_url,
        }
    })
}

pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

/// `HTTP <status>: <first 100 characters of body>`.
pub fn failure_summary(status: u16, body: &str) -> String {
    let excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    format!("HTTP {status}: {excerpt}")
}

/// Turns a received HTTP response into a job outcome.
///
/// Non-2xx statuses fail the job. Any 2xx completes it: JSON bodies are kept
/// as-is, while unparseable JSON and non-JSON bodies fall back to
/// [`fallback_payload`].
pub fn interpret_response(
    job_id: &str,
    website_url: &str,
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> WebhookOutcome {
    if !(200..300).contains(&status) {
        dash_warn!("Webhook for {} answered HTTP {}", job_id, status);
        return WebhookOutcome::failed(failure_summary(status, body));
    }

    if !is_json_content_type(content_type) {
        dash_debug!(
            "Webhook for {} returned non-JSON body ({} bytes)",
            job_id,
            body.len()
        );
        return WebhookOutcome::Completed(fallback_payload(job_id, website_url));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => WebhookOutcome::Completed(parsed),
        Err(err) => {
            dash_warn!("Webhook JSON for {} did not parse: {}", job_id, err);
            WebhookOutcome::Completed(fallback_payload(job_id, website_url))
        }
    }
}
