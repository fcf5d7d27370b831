use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashboard_core::JobId;
use dashboard_logging::{dash_debug, dash_trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink};

#[derive(Debug, Clone)]
pub struct TickerSettings {
    pub interval: Duration,
    /// Upper bound (exclusive) of the random increment per tick.
    pub max_increment: f64,
}

impl Default for TickerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_increment: 15.0,
        }
    }
}

/// One cancelable progress simulation task per running job.
pub struct ProgressTickers {
    settings: TickerSettings,
    running: HashMap<JobId, CancellationToken>,
}

impl ProgressTickers {
    pub fn new(settings: TickerSettings) -> Self {
        Self {
            settings,
            running: HashMap::new(),
        }
    }

    /// Spawns the ticker for `job_id`. A ticker already running for that id is kept.
    pub fn start(&mut self, runtime: &Handle, job_id: JobId, sink: Arc<dyn EventSink>) {
        if self.running.contains_key(&job_id) {
            return;
        }
        let token = CancellationToken::new();
        let period = self.settings.interval;
        let max_increment = self.settings.max_increment;
        let task_token = token.clone();
        let task_job_id = job_id.clone();

        runtime.spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        let increment = if max_increment > 0.0 {
                            rng.gen_range(0.0..max_increment)
                        } else {
                            0.0
                        };
                        dash_trace!("Tick {} +{:.2}", task_job_id, increment);
                        sink.emit(EngineEvent::ProgressTick {
                            job_id: task_job_id.clone(),
                            increment,
                        });
                    }
                }
            }
        });

        dash_debug!("Ticker started for {}", job_id);
        self.running.insert(job_id, token);
    }

    /// Cancels the ticker for `job_id`. Returns `false` if none was running.
    pub fn stop(&mut self, job_id: &str) -> bool {
        match self.running.remove(job_id) {
            Some(token) => {
                token.cancel();
                dash_debug!("Ticker stopped for {}", job_id);
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        for (_, token) in self.running.drain() {
            token.cancel();
        }
    }
}

impl Drop for ProgressTickers {
    fn drop(&mut self) {
        self.stop_all();
    }
}
