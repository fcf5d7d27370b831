use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_core::{JobId, WebhookRequest};

use crate::ticker::{ProgressTickers, TickerSettings};
use crate::webhook::{ReqwestWebhookClient, WebhookClient, WebhookSettings};
use crate::{ChannelEventSink, EngineEvent, EventSink};

enum EngineCommand {
    InvokeWebhook(WebhookRequest),
    StartTicker { job_id: JobId },
    StopTicker { job_id: JobId },
}

/// Runs webhook calls and progress tickers on a background tokio runtime.
///
/// Commands go in through the handle; results come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(webhook: WebhookSettings, ticker: TickerSettings) -> Self {
        Self::with_client(Arc::new(ReqwestWebhookClient::new(webhook)), ticker)
    }

    pub fn with_client(client: Arc<dyn WebhookClient>, ticker: TickerSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut tickers = ProgressTickers::new(ticker);
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::InvokeWebhook(request) => {
                        let client = client.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let outcome = client.deliver(&request).await;
                            sink.emit(EngineEvent::WebhookFinished {
                                job_id: request.payload.job_id,
                                outcome,
                            });
                        });
                    }
                    EngineCommand::StartTicker { job_id } => {
                        tickers.start(runtime.handle(), job_id, sink.clone());
                    }
                    EngineCommand::StopTicker { job_id } => {
                        tickers.stop(&job_id);
                    }
                }
            }
            tickers.stop_all();
        });

        Self { cmd_tx, event_rx }
    }

    pub fn invoke_webhook(&self, request: WebhookRequest) {
        let _ = self.cmd_tx.send(EngineCommand::InvokeWebhook(request));
    }

    pub fn start_ticker(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(EngineCommand::StartTicker {
            job_id: job_id.into(),
        });
    }

    pub fn stop_ticker(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(EngineCommand::StopTicker {
            job_id: job_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
