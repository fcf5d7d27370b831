use std::sync::mpsc;

use dashboard_core::{JobId, WebhookOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Cosmetic progress step for a running job.
    ProgressTick { job_id: JobId, increment: f64 },
    /// The webhook call for a job resolved, successfully or not.
    WebhookFinished {
        job_id: JobId,
        outcome: WebhookOutcome,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
