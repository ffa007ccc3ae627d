#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Bridgewatch
//!
//! Best-effort lifecycle telemetry for real-time media bridges: structured
//! events for conference/content/channel/endpoint/transport transitions,
//! a time-series wire encoder, an asynchronous fire-and-forget HTTP
//! dispatcher, and a multi-publisher metric fan-out.
//!
//! ## Pipeline
//!
//! ```text
//! session model signal
//!     -> LoggingService::conference_created(...)   (facade, caller's thread)
//!     -> factory::conference_created(...)          (pure Event construction)
//!     -> encoder::encode(...)                      (wire JSON, sub-millisecond)
//!     -> AsyncDispatcher::dispatch(...)            (bounded queue + workers)
//! ```
//!
//! In parallel, [`MetricService`] derives aggregate metrics (active
//! conference count, active channel count, conference length) from the same
//! signals and pushes them to every registered
//! [`MetricServicePublisher`](metrics::MetricServicePublisher).
//!
//! Telemetry never affects the session: missing settings mean the sink is
//! not installed, invalid views are skipped at debug level, transport errors
//! are logged and the payload dropped, and one failing metric publisher
//! never starves the others.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use bridgewatch::{TimeSeriesConfig, TimeSeriesLoggingService, LoggingService};
//! use bridgewatch::session::ConferenceView;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = TimeSeriesConfig {
//!     enabled: true,
//!     url_base: Some("http://localhost:8086".into()),
//!     database: Some("bridge".into()),
//!     user: Some("jvb".into()),
//!     password: Some("secret".into()),
//!     ..Default::default()
//! };
//!
//! if let Ok(service) = TimeSeriesLoggingService::new(&config) {
//!     service.conference_created(&ConferenceView {
//!         id: "conf1".into(),
//!         focus: Some("focus@muc.example.com".into()),
//!     });
//! }
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod encoder;
pub mod error;
pub mod event;
pub mod factory;
pub mod logging;
pub mod metrics;
pub mod session;

// Re-exports
pub use config::{MetricsConfig, TimeSeriesConfig};
pub use dispatcher::AsyncDispatcher;
pub use error::{ConfigError, DispatchError, PublishError};
pub use event::{Event, EventValue};
pub use logging::{LoggingService, TimeSeriesLoggingService};
pub use metrics::{MetricService, MetricServicePublisher, PublishOutcome, PublisherRegistry};
