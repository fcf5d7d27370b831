//! Dashboard core: job lifecycle state machine, derived stats and view-model helpers.
mod effect;
mod job;
mod msg;
mod persistence;
mod response;
mod state;
mod stats;
mod store;
mod submit;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{
    CompletedResult, FailedResult, Job, JobData, JobId, JobStatus, PROGRESS_CAP, PROGRESS_DONE,
};
pub use msg::Msg;
pub use persistence::{JobPersistence, KeyValueStore, MemoryStore, PersistenceError, JOBS_KEY};
pub use response::{
    failure_summary, fallback_payload, interpret_response, is_json_content_type, WebhookOutcome,
    ERROR_BODY_LIMIT, FALLBACK_COMPANY_NAME,
};
pub use state::AppState;
pub use stats::Stats;
pub use store::JobStore;
pub use submit::{
    host_of, iso_timestamp, validate_website_url, AssetOptions, OutputOptions, SubmitError,
    ValidatedUrl, WebhookPayload, WebhookRequest, DEFAULT_WEBHOOK_URL,
};
pub use update::update;
pub use view_model::{doc_url, duration_text, job_label, AppViewModel, JobRowView};
