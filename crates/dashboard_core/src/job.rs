use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::WebhookOutcome;

pub type JobId = String;

/// Upper bound for simulated progress while the webhook call is outstanding.
pub const PROGRESS_CAP: f64 = 95.0;
pub const PROGRESS_DONE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Processing)
    }
}

/// Result payload attached to a job when it reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobData {
    Completed(CompletedResult),
    Failed(FailedResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_folder_url: Option<String>,
    /// Payload exactly as returned by the webhook (or the synthesized fallback).
    pub raw: Value,
}

impl CompletedResult {
    /// Resolves the well-known fields out of an arbitrarily shaped payload.
    ///
    /// Each field takes the first non-empty string among its candidate paths.
    pub fn from_payload(raw: Value) -> Self {
        let company_name = first_non_empty(&raw, &["/results/company_name", "/company_profile/name"]);
        let doc_url = first_non_empty(
            &raw,
            &["/storage/doc_url", "/results/doc_url", "/doc_url"],
        );
        let drive_folder_url = first_non_empty(&raw, &["/storage/drive_folder_url"]);
        Self {
            company_name,
            doc_url,
            drive_folder_url,
            raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedResult {
    #[serde(rename = "error")]
    pub error_message: String,
}

fn first_non_empty(raw: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|pointer| raw.pointer(pointer))
        .filter_map(Value::as_str)
        .find(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// One submitted website and its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    id: JobId,
    website_url: String,
    status: JobStatus,
    start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<DateTime<Utc>>,
    progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<JobData>,
}

impl Job {
    pub fn new(id: JobId, website_url: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            website_url: website_url.into(),
            status: JobStatus::Processing,
            start_time,
            end_time: None,
            progress: 0.0,
            data: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn website_url(&self) -> &str {
        &self.website_url
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn data(&self) -> Option<&JobData> {
        self.data.as_ref()
    }

    pub fn completed_result(&self) -> Option<&CompletedResult> {
        match &self.data {
            Some(JobData::Completed(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.data {
            Some(JobData::Failed(failed)) => Some(failed.error_message.as_str()),
            _ => None,
        }
    }

    /// Elapsed seconds between start and end, if the job has ended.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.end_time.map(|end| {
            let elapsed = end - self.start_time;
            match elapsed.num_nanoseconds() {
                Some(nanos) => nanos as f64 / 1e9,
                // Spans past ~292 years overflow i64 nanoseconds.
                None => elapsed.num_milliseconds() as f64 / 1000.0,
            }
        })
    }

    /// Adds a simulated progress step. Returns `false` when nothing changed.
    ///
    /// Only processing jobs move, never backwards and never past [`PROGRESS_CAP`].
    pub fn advance_progress(&mut self, increment: f64) -> bool {
        if self.status.is_terminal() || !increment.is_finite() || increment <= 0.0 {
            return false;
        }
        let next = (self.progress + increment).min(PROGRESS_CAP);
        if next <= self.progress {
            return false;
        }
        self.progress = next;
        true
    }

    /// Moves a processing job into its terminal state. Terminal jobs never change again.
    pub fn finalize(&mut self, outcome: WebhookOutcome, now: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let (status, data) = match outcome {
            WebhookOutcome::Completed(payload) => (
                JobStatus::Completed,
                JobData::Completed(CompletedResult::from_payload(payload)),
            ),
            WebhookOutcome::Failed { message } => (
                JobStatus::Failed,
                JobData::Failed(FailedResult {
                    error_message: message,
                }),
            ),
        };
        self.status = status;
        self.end_time = Some(now.max(self.start_time));
        self.progress = PROGRESS_DONE;
        self.data = Some(data);
        true
    }
}
