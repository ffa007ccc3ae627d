//! Metric fan-out: a pluggable list of publishers fed by the same lifecycle
//! signals as the time-series pipeline.
//!
//! The [`MetricService`] facade iterates every registered
//! [`MetricServicePublisher`] and isolates failures per publisher: one
//! backend erroring or not supporting a metric kind never prevents delivery
//! to the others. Publishers are constructed at startup through an explicit
//! [`PublisherRegistry`] keyed by configuration entries.

pub mod publisher;
pub mod service;

pub use publisher::{MetricServicePublisher, PublishOutcome, PublisherRegistry};
pub use service::{
    active_channel_count, active_conference_count, MetricService, METRIC_CHANNELS,
    METRIC_CHANNEL_START, METRIC_CONFERENCES, METRIC_CONFERENCE_LENGTH,
};
