use crate::{host_of, Job, JobId, JobStatus, Stats};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub webhook_url: String,
    pub input: String,
    pub submitting: bool,
    pub confirm_clear_pending: bool,
    pub stats: Stats,
    pub success_rate: u32,
    pub jobs: Vec<JobRowView>,
    pub last_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub label: String,
    pub website_url: String,
    pub status: JobStatus,
    pub progress: f64,
    pub duration: String,
    pub doc_url: Option<String>,
    pub drive_folder_url: Option<String>,
    pub error: Option<String>,
}

impl JobRowView {
    pub fn from_job(job: &Job) -> Self {
        let completed = job.completed_result();
        Self {
            job_id: job.id().to_owned(),
            label: job_label(job),
            website_url: job.website_url().to_owned(),
            status: job.status(),
            progress: job.progress(),
            duration: duration_text(job),
            doc_url: doc_url(job).map(ToOwned::to_owned),
            drive_folder_url: completed.and_then(|result| result.drive_folder_url.clone()),
            error: job.error_message().map(ToOwned::to_owned),
        }
    }
}

/// Display name: the company name from the result, else the hostname, else the raw URL.
pub fn job_label(job: &Job) -> String {
    job.completed_result()
        .and_then(|result| result.company_name.clone())
        .or_else(|| host_of(job.website_url()))
        .unwrap_or_else(|| job.website_url().to_owned())
}

/// Link to the generated document, if the result carried one.
pub fn doc_url(job: &Job) -> Option<&str> {
    job.completed_result()
        .and_then(|result| result.doc_url.as_deref())
}

/// Whole elapsed seconds (`"12s"`), or `"In progress..."` while the job runs.
pub fn duration_text(job: &Job) -> String {
    match job.end_time() {
        Some(end) => format!("{}s", (end - job.start_time()).num_seconds()),
        None => "In progress...".to_string(),
    }
}
