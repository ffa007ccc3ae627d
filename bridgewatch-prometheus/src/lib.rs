//! Prometheus metric publisher for `bridgewatch`.
//! Bring your own `prometheus::Registry`; collectors are registered up front.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use bridgewatch::metrics::{MetricServicePublisher, PublishOutcome};
use bridgewatch::PublishError;
use prometheus::{GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use tracing::warn;

/// Publishes bridgewatch metrics into a Prometheus registry.
///
/// Numeric metrics become gauges, incremental metrics counters, and measured
/// transactions histogram observations of the elapsed seconds. String
/// metrics have no Prometheus representation and report `Unsupported`.
#[derive(Clone, Debug)]
pub struct PrometheusPublisher {
    registry: Arc<Registry>,
    gauges: GaugeVec,
    counters: IntCounterVec,
    durations: HistogramVec,
    started: Arc<Mutex<HashMap<(String, String), Instant>>>,
}

impl PrometheusPublisher {
    /// Create a publisher and register its collectors into the registry.
    ///
    /// # Errors
    /// Returns an error if a collector cannot be registered (e.g. name
    /// conflict).
    pub fn new<R: Into<Arc<Registry>>>(registry: R) -> Result<Self, prometheus::Error> {
        let registry = registry.into();
        let gauges = GaugeVec::new(
            Opts::new("bridgewatch_metric", "Point-in-time bridge metrics"),
            &["metric"],
        )?;
        let counters = IntCounterVec::new(
            Opts::new("bridgewatch_increments_total", "Incremental bridge metrics"),
            &["metric"],
        )?;
        let durations = HistogramVec::new(
            HistogramOpts::new(
                "bridgewatch_transaction_seconds",
                "Measured transaction durations",
            ),
            &["transaction"],
        )?;
        registry.register(Box::new(gauges.clone()))?;
        registry.register(Box::new(counters.clone()))?;
        registry.register(Box::new(durations.clone()))?;
        Ok(Self {
            registry,
            gauges,
            counters,
            durations,
            started: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Expose the registry for HTTP scraping.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl MetricServicePublisher for PrometheusPublisher {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn publish_numeric(&self, metric: &str, value: i64) -> PublishOutcome {
        self.gauges.with_label_values(&[metric]).set(value as f64);
        PublishOutcome::Published
    }

    fn publish_incremental(&self, metric: &str, delta: i64) -> PublishOutcome {
        if delta < 0 {
            return PublishOutcome::Failed(PublishError::new(format!(
                "counter {} cannot decrease by {}",
                metric, delta
            )));
        }
        self.counters.with_label_values(&[metric]).inc_by(delta as u64);
        PublishOutcome::Published
    }

    fn start_measured_transaction(
        &self,
        transaction_type: &str,
        transaction_id: &str,
    ) -> PublishOutcome {
        let key = (transaction_type.to_owned(), transaction_id.to_owned());
        match self.started.lock() {
            Ok(mut started) => {
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
        match start {
            Some(start) => {
                self.durations
                    .with_label_values(&[transaction_type])
                    .observe(start.elapsed().as_secs_f64());
                PublishOutcome::Published
            }
            None => PublishOutcome::Failed(PublishError::new(format!(
                "no matching start for transaction {} / {}",
                transaction_type, transaction_id
            ))),
        }
    }
}
