//! The fan-out facade and the derived-metric counting logic.

use std::sync::Arc;

use tracing::{debug, error};

use crate::config::MetricsConfig;
use crate::logging::LoggingService;
use crate::metrics::publisher::{MetricServicePublisher, PublishOutcome, PublisherRegistry};
use crate::session::{ChannelView, ConferenceView, SessionModel};

/// Name of the active-conference-count metric.
pub const METRIC_CONFERENCES: &str = "conferences";
/// Name of the active-channel-count metric.
pub const METRIC_CHANNELS: &str = "channels";
/// Name of the conference-length measured transaction.
pub const METRIC_CONFERENCE_LENGTH: &str = "conference_length";
/// Name of the channel-start string metric.
pub const METRIC_CHANNEL_START: &str = "channel_start";

/// Counts conferences whose expired flag is not set.
///
/// This is a point-in-time snapshot of the live tree. Lifecycle handlers run
/// after the expired flag flips but possibly before the entity leaves the
/// model's list, so the flag, not list membership, is what's counted. The
/// tree may mutate mid-traversal; the count is approximate under concurrency.
pub fn active_conference_count(model: &dyn SessionModel) -> i64 {
    model.conferences().iter().filter(|c| !c.expired()).count() as i64
}

/// Counts non-expired channels inside non-expired contents of non-expired
/// conferences. Same snapshot semantics as [`active_conference_count`].
pub fn active_channel_count(model: &dyn SessionModel) -> i64 {
    let mut count = 0i64;
    for conference in model.conferences() {
        if conference.expired() {
            continue;
        }
        for content in conference.contents() {
            if content.expired() {
                continue;
            }
            count += content.channels().iter().filter(|ch| !ch.expired()).count() as i64;
        }
    }
    count
}

/// Fans metric writes out to every registered publisher.
///
/// The publisher list is populated once at construction and immutable
/// afterwards, safe for unsynchronized concurrent reads. As a
/// [`LoggingService`] it derives aggregate metrics from conference and
/// channel boundary transitions by recounting the live session tree.
pub struct MetricService {
    publishers: Vec<Arc<dyn MetricServicePublisher>>,
    model: Arc<dyn SessionModel>,
}

impl MetricService {
    /// Builds the service from configuration, instantiating each configured
    /// publisher through `registry`. Entries that fail to construct are
    /// skipped; the service starts with whatever remains.
    pub fn new(
        config: &MetricsConfig,
        registry: &PublisherRegistry,
        model: Arc<dyn SessionModel>,
    ) -> Self {
        let publishers = registry.build(&config.publishers);
        debug!(count = publishers.len(), "metric publishers enabled");
        Self { publishers, model }
    }

    /// Builds the service from an explicit publisher list. Used by hosts
    /// that wire publishers programmatically, and by tests.
    pub fn with_publishers(
        publishers: Vec<Arc<dyn MetricServicePublisher>>,
        model: Arc<dyn SessionModel>,
    ) -> Self {
        Self { publishers, model }
    }

    /// Number of publishers receiving metrics.
    pub fn publisher_count(&self) -> usize {
        self.publishers.len()
    }

    /// Publishes a numeric metric to every publisher.
    pub fn publish_numeric(&self, metric: &str, value: i64) {
        self.fan_out(metric, |p| p.publish_numeric(metric, value));
    }

    /// Publishes a string metric to every publisher.
    pub fn publish_string(&self, metric: &str, value: &str) {
        self.fan_out(metric, |p| p.publish_string(metric, value));
    }

    /// Increments a metric by one on every publisher.
    pub fn publish_incremental(&self, metric: &str) {
        self.publish_incremental_by(metric, 1);
    }

    /// Increments a metric by `delta` on every publisher.
    pub fn publish_incremental_by(&self, metric: &str, delta: i64) {
        self.fan_out(metric, |p| p.publish_incremental(metric, delta));
    }

    /// Records a transaction start on every publisher.
    pub fn start_transaction(&self, transaction_type: &str, transaction_id: &str) {
        self.fan_out(transaction_type, |p| {
            p.start_measured_transaction(transaction_type, transaction_id)
        });
    }

    /// Records a transaction end on every publisher; the backends derive the
    /// elapsed duration.
    pub fn end_transaction(&self, transaction_type: &str, transaction_id: &str) {
        self.fan_out(transaction_type, |p| {
            p.end_measured_transaction(transaction_type, transaction_id)
        });
    }

    fn fan_out<F>(&self, metric: &str, op: F)
    where
        F: Fn(&dyn MetricServicePublisher) -> PublishOutcome,
    {
        for publisher in &self.publishers {
            match op(publisher.as_ref()) {
                PublishOutcome::Published => {}
                PublishOutcome::Unsupported => {
                    debug!(
                        publisher = publisher.name(),
                        metric, "publisher doesn't support metric"
                    );
                }
                PublishOutcome::Failed(e) => {
                    error!(
                        publisher = publisher.name(),
                        metric,
                        error = %e,
                        "error publishing metric"
                    );
                }
            }
        }
    }
}

impl LoggingService for MetricService {
    fn conference_created(&self, conference: &ConferenceView) {
        self.publish_numeric(METRIC_CONFERENCES, active_conference_count(self.model.as_ref()));
        self.start_transaction(METRIC_CONFERENCE_LENGTH, &conference.id);
    }

    fn conference_expired(&self, conference: &ConferenceView) {
        self.publish_numeric(METRIC_CONFERENCES, active_conference_count(self.model.as_ref()));
        self.end_transaction(METRIC_CONFERENCE_LENGTH, &conference.id);
    }

    fn channel_created(&self, _channel: &ChannelView) {
        self.publish_numeric(METRIC_CHANNELS, active_channel_count(self.model.as_ref()));
    }

    fn channel_expired(&self, _channel: &ChannelView) {
        self.publish_numeric(METRIC_CHANNELS, active_channel_count(self.model.as_ref()));
    }

    fn channel_started_streaming(&self, channel: &ChannelView) {
        let Some(remote_address) = channel.remote_address.as_deref() else {
            debug!(channel = %channel.id, "skipping channel start metric: no remote address");
            return;
        };
        self.publish_string(METRIC_CHANNEL_START, remote_address);
    }
}
