use crate::{Job, JobId, WebhookRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write the full job list under the fixed key.
    PersistJobs(Vec<Job>),
    /// Remove the persisted record entirely.
    ClearPersistedJobs,
    StartProgressTicker { job_id: JobId },
    StopProgressTicker { job_id: JobId },
    InvokeWebhook(WebhookRequest),
    /// Remember the webhook endpoint the user configured.
    SaveWebhookUrl(String),
}
