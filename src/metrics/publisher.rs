//! The publisher capability interface and the startup registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::error::PublishError;

/// Outcome of a single publisher operation.
///
/// Publishers report `Unsupported` for metric kinds they don't implement;
/// the fan-out logs it at debug level and moves on. Anything that actually
/// went wrong comes back as `Failed` and is logged at error level with the
/// publisher's name. Either way iteration continues.
#[derive(Debug)]
pub enum PublishOutcome {
    /// The metric was accepted by the backend.
    Published,
    /// The publisher does not implement this metric kind. Expected, benign.
    Unsupported,
    /// The publisher failed while accepting the metric.
    Failed(PublishError),
}

impl PublishOutcome {
    /// True if the write was accepted.
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published)
    }
}

/// A metric backend. Every operation defaults to `Unsupported`, so concrete
/// publishers implement only the kinds they can store.
///
/// Calls arrive synchronously on the session model's transition threads and
/// may be concurrent; implementations synchronize their own state.
pub trait MetricServicePublisher: Send + Sync {
    /// Human-readable backend name, used in failure logs.
    fn name(&self) -> &str;

    /// Publishes a point-in-time numeric value.
    fn publish_numeric(&self, metric: &str, value: i64) -> PublishOutcome {
        let _ = (metric, value);
        PublishOutcome::Unsupported
    }

    /// Publishes a string value.
    fn publish_string(&self, metric: &str, value: &str) -> PublishOutcome {
        let _ = (metric, value);
        PublishOutcome::Unsupported
    }

    /// Increments a counter by `delta`.
    fn publish_incremental(&self, metric: &str, delta: i64) -> PublishOutcome {
        let _ = (metric, delta);
        PublishOutcome::Unsupported
    }

    /// Records the start of a measured transaction, correlated by
    /// `(transaction_type, transaction_id)`.
    fn start_measured_transaction(
        &self,
        transaction_type: &str,
        transaction_id: &str,
    ) -> PublishOutcome {
        let _ = (transaction_type, transaction_id);
        PublishOutcome::Unsupported
    }

    /// Records the end of a measured transaction; the backend derives the
    /// elapsed duration from the matching start.
    fn end_measured_transaction(
        &self,
        transaction_type: &str,
        transaction_id: &str,
    ) -> PublishOutcome {
        let _ = (transaction_type, transaction_id);
        PublishOutcome::Unsupported
    }
}

/// Factory function producing a publisher instance.
pub type PublisherFactory =
    Box<dyn Fn() -> Result<Arc<dyn MetricServicePublisher>, PublishError> + Send + Sync>;

/// Maps configuration keys to publisher constructors.
///
/// Populated at startup by the host; replaces construct-by-class-name
/// reflection with an explicit, link-time-checked mapping. A factory that
/// fails is logged and skipped so the service still starts with the rest.
#[derive(Default)]
pub struct PublisherRegistry {
    factories: HashMap<String, PublisherFactory>,
}

impl PublisherRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `key`, replacing any previous entry.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        factory: impl Fn() -> Result<Arc<dyn MetricServicePublisher>, PublishError>
            + Send
            + Sync
            + 'static,
    ) {
        self.factories.insert(key.into(), Box::new(factory));
    }

    /// Instantiates one publisher per configured key, in order.
    ///
    /// Unknown keys and failing factories are logged and skipped.
    pub fn build(&self, keys: &[String]) -> Vec<Arc<dyn MetricServicePublisher>> {
        let mut publishers = Vec::with_capacity(keys.len());
        for key in keys {
            match self.factories.get(key) {
                Some(factory) => match factory() {
                    Ok(publisher) => {
                        info!(publisher = key.as_str(), "initialized metric publisher");
                        publishers.push(publisher);
                    }
                    Err(e) => {
                        error!(publisher = key.as_str(), error = %e, "error initializing metric publisher");
                    }
                },
                None => {
                    error!(publisher = key.as_str(), "no registered factory for metric publisher");
                }
            }
        }
        publishers
    }
}
