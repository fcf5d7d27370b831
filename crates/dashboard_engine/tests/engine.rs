use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashboard_core::{
    update, validate_website_url, AppState, Effect, JobStatus, Msg, WebhookOutcome,
    WebhookPayload, WebhookRequest, PROGRESS_CAP, PROGRESS_DONE,
};
use dashboard_engine::{EngineEvent, EngineHandle, TickerSettings, WebhookClient};
use serde_json::json;
use tokio::sync::Notify;

/// Answers only after `release` is notified, so ticks can accumulate first.
struct GatedClient {
    release: Arc<Notify>,
    calls: AtomicUsize,
    outcome: WebhookOutcome,
}

#[async_trait::async_trait]
impl WebhookClient for GatedClient {
    async fn deliver(&self, _request: &WebhookRequest) -> WebhookOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        self.outcome.clone()
    }
}

fn fast_ticks() -> TickerSettings {
    TickerSettings {
        interval: Duration::from_millis(10),
        max_increment: 15.0,
    }
}

fn request(job_id: &str) -> WebhookRequest {
    let target = validate_website_url("https://acme.example").unwrap();
    WebhookRequest {
        endpoint: "http://unused.invalid/hook".to_string(),
        payload: WebhookPayload::new(job_id.to_string(), &target, Utc::now()),
    }
}

fn wait_for<F>(engine: &EngineHandle, deadline: Duration, mut pred: F) -> Vec<EngineEvent>
where
    F: FnMut(&EngineEvent) -> bool,
{
    let start = Instant::now();
    let mut seen = Vec::new();
    while start.elapsed() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(20)) {
            let done = pred(&event);
            seen.push(event);
            if done {
                break;
            }
        }
    }
    seen
}

#[test]
fn ticker_emits_bounded_increments_until_stopped() {
    let release = Arc::new(Notify::new());
    let client = Arc::new(GatedClient {
        release: release.clone(),
        calls: AtomicUsize::new(0),
        outcome: WebhookOutcome::Completed(json!({})),
    });
    let engine = EngineHandle::with_client(client, fast_ticks());

    engine.start_ticker("JOB_1");
    let mut ticks = 0;
    let events = wait_for(&engine, Duration::from_secs(2), |event| {
        if matches!(event, EngineEvent::ProgressTick { .. }) {
            ticks += 1;
        }
        ticks >= 3
    });
    for event in &events {
        match event {
            EngineEvent::ProgressTick { job_id, increment } => {
                assert_eq!(job_id, "JOB_1");
                assert!((0.0..15.0).contains(increment));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert!(ticks >= 3);

    engine.stop_ticker("JOB_1");
    // Drain anything emitted before the stop landed, then expect silence.
    std::thread::sleep(Duration::from_millis(50));
    while engine.try_recv().is_some() {}
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(engine.try_recv(), None);
}

#[test]
fn full_lifecycle_through_update_and_engine() {
    let release = Arc::new(Notify::new());
    let client = Arc::new(GatedClient {
        release: release.clone(),
        calls: AtomicUsize::new(0),
        outcome: WebhookOutcome::Completed(json!({"results": {"company_name": "Acme Inc"}})),
    });
    let engine = EngineHandle::with_client(client.clone(), fast_ticks());

    let (state, _) = update(AppState::new(), Msg::InputChanged("https://acme.example".into()));
    let (mut state, effects) = update(state, Msg::SubmitClicked { now: Utc::now() });
    let mut job_id = String::new();
    for effect in effects {
        match effect {
            Effect::StartProgressTicker { job_id: id } => {
                job_id = id.clone();
                engine.start_ticker(id);
            }
            Effect::InvokeWebhook(request) => engine.invoke_webhook(request),
            _ => {}
        }
    }

    // Let a few ticks land before the webhook answers.
    let mut ticks = 0;
    for event in wait_for(&engine, Duration::from_secs(2), |event| {
        if matches!(event, EngineEvent::ProgressTick { .. }) {
            ticks += 1;
        }
        ticks >= 3
    }) {
        if let EngineEvent::ProgressTick { job_id, increment } = event {
            state = update(state, Msg::ProgressTick { job_id, increment }).0;
        }
    }
    assert!(ticks >= 3);
    let job = state.job(&job_id).unwrap();
    assert_eq!(job.status(), JobStatus::Processing);
    assert!(job.progress() <= PROGRESS_CAP);

    release.notify_one();
    let events = wait_for(&engine, Duration::from_secs(2), |event| {
        matches!(event, EngineEvent::WebhookFinished { .. })
    });
    for event in events {
        let msg = match event {
            EngineEvent::ProgressTick { job_id, increment } => {
                Msg::ProgressTick { job_id, increment }
            }
            EngineEvent::WebhookFinished { job_id, outcome } => Msg::WebhookFinished {
                job_id,
                outcome,
                now: Utc::now(),
            },
        };
        let (next, effects) = update(state, msg);
        state = next;
        for effect in effects {
            if let Effect::StopProgressTicker { job_id } = effect {
                engine.stop_ticker(job_id);
            }
        }
    }

    let job = state.job(&job_id).unwrap();
    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.progress(), PROGRESS_DONE);
    assert!(!state.is_submitting());
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    // Late ticks still in the channel cannot move a finished job.
    std::thread::sleep(Duration::from_millis(50));
    while let Some(event) = engine.try_recv() {
        if let EngineEvent::ProgressTick { job_id, increment } = event {
            state = update(state, Msg::ProgressTick { job_id, increment }).0;
        }
    }
    assert_eq!(state.job(&job_id).unwrap().progress(), PROGRESS_DONE);
}

#[test]
fn webhook_event_carries_job_id() {
    let release = Arc::new(Notify::new());
    release.notify_one();
    let client = Arc::new(GatedClient {
        release,
        calls: AtomicUsize::new(0),
        outcome: WebhookOutcome::failed("nope"),
    });
    let engine = EngineHandle::with_client(client, fast_ticks());
    engine.invoke_webhook(request("JOB_42"));

    let event = engine.recv_timeout(Duration::from_secs(2));
    assert_eq!(
        event,
        Some(EngineEvent::WebhookFinished {
            job_id: "JOB_42".to_string(),
            outcome: WebhookOutcome::failed("nope"),
        })
    );
}
