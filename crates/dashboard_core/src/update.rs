use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked { now } => match state.begin_submission(now) {
            Ok(effects) => effects,
            Err(err) => {
                state.reject_submission(err);
                Vec::new()
            }
        },
        Msg::ProgressTick { job_id, increment } => state.apply_tick(&job_id, increment),
        Msg::WebhookFinished {
            job_id,
            outcome,
            now,
        } => state.finalize(job_id, outcome, now),
        Msg::ClearHistoryRequested => {
            state.request_clear();
            Vec::new()
        }
        Msg::ClearHistoryConfirmed => state.confirm_clear(),
        Msg::ClearHistoryCancelled => {
            state.cancel_clear();
            Vec::new()
        }
        Msg::WebhookUrlChanged(url) => {
            let url = url.trim().to_string();
            if state.set_webhook_url(url.clone()) {
                vec![Effect::SaveWebhookUrl(url)]
            } else {
                Vec::new()
            }
        }
        Msg::RestoreJobs(jobs) => {
            state.restore(jobs);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
