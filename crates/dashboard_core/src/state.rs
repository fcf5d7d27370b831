use chrono::{DateTime, Utc};
use dashboard_logging::{dash_debug, dash_info};

use crate::view_model::{AppViewModel, JobRowView};
use crate::{
    validate_website_url, Effect, Job, JobId, JobStatus, JobStore, Stats, SubmitError,
    WebhookOutcome, WebhookPayload, WebhookRequest, DEFAULT_WEBHOOK_URL,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    store: JobStore,
    webhook_url: String,
    input: String,
    /// Job whose webhook call is outstanding; at most one at a time.
    in_flight: Option<JobId>,
    confirm_clear_pending: bool,
    last_error: Option<SubmitError>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_webhook_url(DEFAULT_WEBHOOK_URL)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_webhook_url(webhook_url: impl Into<String>) -> Self {
        Self {
            store: JobStore::new(),
            webhook_url: webhook_url.into(),
            input: String::new(),
            in_flight: None,
            confirm_clear_pending: false,
            last_error: None,
            dirty: false,
        }
    }

    pub fn jobs(&self) -> &[Job] {
        self.store.jobs()
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.store.get(id)
    }

    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&SubmitError> {
        self.last_error.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let stats = self.store.stats();
        AppViewModel {
            webhook_url: self.webhook_url.clone(),
            input: self.input.clone(),
            submitting: self.is_submitting(),
            confirm_clear_pending: self.confirm_clear_pending,
            stats,
            success_rate: stats.success_rate(),
            jobs: self.store.jobs().iter().map(JobRowView::from_job).collect(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_webhook_url(&mut self, url: String) -> bool {
        if self.webhook_url == url {
            return false;
        }
        self.webhook_url = url;
        self.mark_dirty();
        true
    }

    /// Validates the input, creates the job and returns the effects that start it.
    pub(crate) fn begin_submission(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, SubmitError> {
        let target = validate_website_url(&self.input)?;
        if self.in_flight.is_some() {
            return Err(SubmitError::AlreadySubmitting);
        }

        let job_id = self.store.fresh_id(now);
        let job = Job::new(job_id.clone(), target.url.clone(), now);
        let Some(persist) = self.store.prepend(job) else {
            // fresh_id never collides; treat a collision as a rejected submission.
            return Err(SubmitError::AlreadySubmitting);
        };
        dash_info!("Created {} for {}", job_id, target.url);

        self.in_flight = Some(job_id.clone());
        self.last_error = None;
        self.mark_dirty();

        let request = WebhookRequest {
            endpoint: self.webhook_url.clone(),
            payload: WebhookPayload::new(job_id.clone(), &target, now),
        };
        Ok(vec![
            persist,
            Effect::StartProgressTicker { job_id },
            Effect::InvokeWebhook(request),
        ])
    }

    pub(crate) fn reject_submission(&mut self, err: SubmitError) {
        dash_debug!("Submission rejected: {}", err);
        self.last_error = Some(err);
        self.mark_dirty();
    }

    pub(crate) fn apply_tick(&mut self, job_id: &str, increment: f64) -> Vec<Effect> {
        let processing = self
            .store
            .get(job_id)
            .is_some_and(|job| job.status() == JobStatus::Processing);
        if !processing {
            return vec![Effect::StopProgressTicker {
                job_id: job_id.to_owned(),
            }];
        }
        match self
            .store
            .update_by_id(job_id, |job| job.advance_progress(increment))
        {
            Some(persist) => {
                self.mark_dirty();
                vec![persist]
            }
            None => Vec::new(),
        }
    }

    /// Stops the ticker, settles the job and releases the submission guard.
    pub(crate) fn finalize(
        &mut self,
        job_id: JobId,
        outcome: WebhookOutcome,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        let mut effects = vec![Effect::StopProgressTicker {
            job_id: job_id.clone(),
        }];
        if let Some(persist) = self
            .store
            .update_by_id(&job_id, |job| job.finalize(outcome, now))
        {
            if let Some(job) = self.store.get(&job_id) {
                dash_info!("{} finished as {:?}", job_id, job.status());
            }
            effects.push(persist);
        }
        if self.in_flight.as_deref() == Some(job_id.as_str()) {
            self.in_flight = None;
            self.input.clear();
        }
        self.mark_dirty();
        effects
    }

    pub(crate) fn request_clear(&mut self) {
        if !self.confirm_clear_pending {
            self.confirm_clear_pending = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn cancel_clear(&mut self) {
        if self.confirm_clear_pending {
            self.confirm_clear_pending = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn confirm_clear(&mut self) -> Vec<Effect> {
        if !self.confirm_clear_pending {
            return Vec::new();
        }
        self.confirm_clear_pending = false;
        let mut effects: Vec<Effect> = self
            .store
            .jobs()
            .iter()
            .filter(|job| job.status() == JobStatus::Processing)
            .map(|job| Effect::StopProgressTicker {
                job_id: job.id().to_owned(),
            })
            .collect();
        dash_info!("Clearing {} jobs from history", self.store.len());
        effects.push(self.store.clear());
        self.mark_dirty();
        effects
    }

    /// Loads jobs read from storage. Nothing is written back, so an unreadable
    /// record stays as it was until the next real change.
    pub(crate) fn restore(&mut self, jobs: Vec<Job>) {
        self.store.replace_all(jobs);
        self.mark_dirty();
    }
}
