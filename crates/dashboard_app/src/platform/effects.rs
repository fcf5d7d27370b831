use std::path::PathBuf;

use chrono::Utc;
use dashboard_core::{Effect, Job, JobPersistence, Msg};
use dashboard_engine::{EngineEvent, EngineHandle, FileStore, TickerSettings, WebhookSettings};
use dashboard_logging::{dash_error, dash_info};

use super::settings::{save_settings, AppSettings};

/// Executes core effects against the engine, job storage and settings file.
pub struct EffectRunner {
    engine: EngineHandle,
    persistence: JobPersistence<FileStore>,
    settings: AppSettings,
    settings_path: PathBuf,
}

impl EffectRunner {
    pub fn new(settings: AppSettings, settings_path: PathBuf) -> Self {
        let engine = EngineHandle::new(WebhookSettings::default(), TickerSettings::default());
        let persistence = JobPersistence::new(FileStore::new(settings.data_dir.clone()));
        Self {
            engine,
            persistence,
            settings,
            settings_path,
        }
    }

    pub fn load_jobs(&self) -> Vec<Job> {
        let jobs = self.persistence.load();
        dash_info!("Loaded {} jobs from history", jobs.len());
        jobs
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PersistJobs(_) | Effect::ClearPersistedJobs => {
                    if let Err(err) = self.persistence.apply(&effect) {
                        dash_error!("Failed to persist jobs: {}", err);
                    }
                }
                Effect::StartProgressTicker { job_id } => self.engine.start_ticker(job_id),
                Effect::StopProgressTicker { job_id } => self.engine.stop_ticker(job_id),
                Effect::InvokeWebhook(request) => {
                    dash_info!(
                        "InvokeWebhook job_id={} url={}",
                        request.payload.job_id,
                        request.payload.website_url
                    );
                    self.engine.invoke_webhook(request);
                }
                Effect::SaveWebhookUrl(url) => {
                    self.settings.webhook_url = url;
                    if let Err(err) = save_settings(&self.settings_path, &self.settings) {
                        dash_error!("{}", err);
                    }
                }
            }
        }
    }

    /// Next engine event, translated into a message for `update`.
    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(|event| match event {
            EngineEvent::ProgressTick { job_id, increment } => {
                Msg::ProgressTick { job_id, increment }
            }
            EngineEvent::WebhookFinished { job_id, outcome } => Msg::WebhookFinished {
                job_id,
                outcome,
                now: Utc::now(),
            },
        })
    }
}
