//! JSONL metric publisher for `bridgewatch`. Writes one metric per line.
//! Always appends; bring your own path.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use bridgewatch::metrics::{MetricServicePublisher, PublishOutcome};
use bridgewatch::PublishError;
use serde_json::json;
use tracing::warn;

/// Appends every metric write as a JSON line to a file.
///
/// Supports all metric kinds; transaction ends carry the elapsed
/// milliseconds derived from the matching start.
#[derive(Debug)]
pub struct JsonlPublisher {
    path: PathBuf,
    started: Mutex<HashMap<(String, String), Instant>>,
}

impl JsonlPublisher {
    /// Creates a publisher appending to `path`. The file is created on the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), started: Mutex::new(HashMap::new()) }
    }

    fn write_line(&self, value: serde_json::Value) -> PublishOutcome {
        let line = value.to_string() + "\n";
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        match result {
            Ok(()) => PublishOutcome::Published,
            Err(e) => PublishOutcome::Failed(PublishError::from(e)),
        }
    }

    fn timestamp_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64)
            .unwrap_or(0)
    }
}

impl MetricServicePublisher for JsonlPublisher {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn publish_numeric(&self, metric: &str, value: i64) -> PublishOutcome {
        self.write_line(json!({
            "kind": "numeric",
            "metric": metric,
            "value": value,
            "ts_ms": Self::timestamp_ms(),
        }))
    }

    fn publish_string(&self, metric: &str, value: &str) -> PublishOutcome {
        self.write_line(json!({
            "kind": "string",
            "metric": metric,
            "value": value,
            "ts_ms": Self::timestamp_ms(),
        }))
    }

    fn publish_incremental(&self, metric: &str, delta: i64) -> PublishOutcome {
        self.write_line(json!({
            "kind": "incremental",
            "metric": metric,
            "delta": delta,
            "ts_ms": Self::timestamp_ms(),
        }))
    }

    fn start_measured_transaction(
        &self,
        transaction_type: &str,
        transaction_id: &str,
    ) -> PublishOutcome {
        match self.started.lock() {
            Ok(mut started) => {
                let key = (transaction_type.to_owned(), transaction_id.to_owned());
                if started.insert(key, Instant::now()).is_some() {
                    warn!(transaction_type, transaction_id, "restarting in-flight transaction");
                }
                PublishOutcome::Published
            }
            Err(_) => PublishOutcome::Failed(PublishError::new("transaction map poisoned")),
        }
    }

    fn end_measured_transaction(
        &self,
        transaction_type: &str,
        transaction_id: &str,
    ) -> PublishOutcome {
        let key = (transaction_type.to_owned(), transaction_id.to_owned());
        let start = match self.started.lock() {
            Ok(mut started) => started.remove(&key),
            Err(_) => return PublishOutcome::Failed(PublishError::new("transaction map poisoned")),
        };
        let Some(start) = start else {
            return PublishOutcome::Failed(PublishError::new(format!(
                "no matching start for transaction {} / {}",
                transaction_type, transaction_id
            )));
        };
        self.write_line(json!({
            "kind": "transaction",
            "transaction": transaction_type,
            "id": transaction_id,
            "elapsed_ms": start.elapsed().as_millis().min(u128::from(u64::MAX)) as u64,
            "ts_ms": Self::timestamp_ms(),
        }))
    }
}
