//! Asynchronous, fire-and-forget delivery of encoded payloads.
//!
//! `dispatch` returns immediately: payloads go onto a bounded queue drained
//! by a fixed pool of worker tasks, each performing one HTTP POST per
//! payload. A full queue drops the incoming payload and bumps a counter.
//! Transport failures and non-200 responses are logged and the payload is
//! discarded; no caller ever observes a delivery failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::error::DispatchError;

/// Hands encoded payloads to background workers for HTTP POST delivery.
///
/// Cheap to clone; clones share the queue, the worker pool and the counter.
#[derive(Clone)]
pub struct AsyncDispatcher {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
}

impl AsyncDispatcher {
    /// Spawns `workers` tasks posting to `url` and returns the dispatcher.
    ///
    /// Must be called from within a tokio runtime. The URL embeds database
    /// name and credentials and is treated as opaque from here on.
    pub fn new(url: String, queue_capacity: usize, workers: usize) -> Self {
        let client = Client::new();
        let (tx, rx) = mpsc::channel::<String>(queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let dropped = Arc::new(AtomicU64::new(0));

        for _ in 0..workers.max(1) {
            let client = client.clone();
            let url = url.clone();
            let rx = Arc::clone(&rx);
            tokio::spawn(async move {
                loop {
                    let payload = { rx.lock().await.recv().await };
                    match payload {
                        Some(payload) => {
                            if let Err(e) = send_post(&client, &url, payload).await {
                                info!(error = %e, "failed to post to time-series backend");
                            }
                        }
                        None => break,
                    }
                }
            });
        }

        Self { tx, dropped }
    }

    /// Enqueues a payload for delivery and returns immediately.
    ///
    /// Under saturation the incoming payload is dropped (drop-newest) and
    /// counted; the event is lost, best-effort by design.
    pub fn dispatch(&self, payload: String) {
        if self.tx.try_send(payload).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            debug!("dispatch queue full, payload dropped");
        }
    }

    /// How many payloads were dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn send_post(client: &Client, url: &str, payload: String) -> Result<(), DispatchError> {
    let response = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await?;

    // The backend signals success strictly with 200.
    let status = response.status();
    if status.as_u16() != 200 {
        return Err(DispatchError::Status(status.as_u16()));
    }
    Ok(())
}
