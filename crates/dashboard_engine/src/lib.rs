//! Dashboard engine: webhook delivery, progress tickers and file-backed storage.
mod engine;
mod persist;
mod ticker;
mod types;
mod webhook;

pub use engine::EngineHandle;
pub use persist::{ensure_data_dir, write_atomic, FileStore, StoreError};
pub use ticker::{ProgressTickers, TickerSettings};
pub use types::{ChannelEventSink, EngineEvent, EventSink};
pub use webhook::{ReqwestWebhookClient, WebhookClient, WebhookError, WebhookSettings};
