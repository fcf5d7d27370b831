use chrono::{DateTime, Utc};

use crate::{Job, JobId, WebhookOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the website URL input.
    InputChanged(String),
    /// User submitted the current input.
    SubmitClicked { now: DateTime<Utc> },
    /// Simulated progress step for a job.
    ProgressTick { job_id: JobId, increment: f64 },
    /// The webhook call for a job resolved.
    WebhookFinished {
        job_id: JobId,
        outcome: WebhookOutcome,
        now: DateTime<Utc>,
    },
    /// User asked to clear the history; needs confirmation.
    ClearHistoryRequested,
    ClearHistoryConfirmed,
    ClearHistoryCancelled,
    /// User edited the webhook endpoint.
    WebhookUrlChanged(String),
    /// Restore jobs read from persistence at startup.
    RestoreJobs(Vec<Job>),
    /// UI/render tick.
    Tick,
    NoOp,
}
