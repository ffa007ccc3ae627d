//! The notification surface the session model calls into, and its single
//! production implementation backed by the time-series pipeline.
//!
//! Every method is a synchronous, non-blocking notification: encoding runs in
//! the caller's thread budget (cheap, no I/O) and only the network POST is
//! deferred to the dispatcher's workers. A missing required field logs at
//! debug level and skips emission; nothing ever propagates to the caller.

use tracing::{debug, info};

use crate::config::TimeSeriesConfig;
use crate::dispatcher::AsyncDispatcher;
use crate::encoder;
use crate::error::ConfigError;
use crate::event::Event;
use crate::factory;
use crate::session::{ChannelView, ConferenceView, ContentView, EndpointView, TransportView};

/// Receives lifecycle notifications from the session model.
///
/// Implementations override only the signals they care about; everything
/// else is a no-op by default. Telemetry must never affect session
/// correctness or liveness, so no method returns an error.
pub trait LoggingService: Send + Sync {
    /// Logs an already-constructed event. Sinks that only derive metrics
    /// from signals ignore this.
    fn log_event(&self, event: Event) {
        let _ = event;
    }

    /// A conference was created.
    fn conference_created(&self, conference: &ConferenceView) {
        let _ = conference;
    }

    /// A conference expired.
    fn conference_expired(&self, conference: &ConferenceView) {
        let _ = conference;
    }

    /// A content group was created.
    fn content_created(&self, content: &ContentView) {
        let _ = content;
    }

    /// A content group expired.
    fn content_expired(&self, content: &ContentView) {
        let _ = content;
    }

    /// An endpoint was created.
    fn endpoint_created(&self, endpoint: &EndpointView) {
        let _ = endpoint;
    }

    /// An endpoint changed its display name.
    fn endpoint_display_name_changed(&self, endpoint: &EndpointView) {
        let _ = endpoint;
    }

    /// A transport manager was created.
    fn transport_created(&self, transport: &TransportView) {
        let _ = transport;
    }

    /// A transport manager reached the connected state.
    fn transport_connected(&self, transport: &TransportView) {
        let _ = transport;
    }

    /// A transport manager changed its negotiation state.
    fn transport_state_changed(
        &self,
        transport: &TransportView,
        old_state: Option<&str>,
        new_state: Option<&str>,
    ) {
        let _ = (transport, old_state, new_state);
    }

    /// A channel was added to a transport manager.
    fn transport_channel_added(&self, transport: &TransportView, channel: &ChannelView) {
        let _ = (transport, channel);
    }

    /// A channel was removed from a transport manager.
    fn transport_channel_removed(&self, transport: &TransportView, channel: &ChannelView) {
        let _ = (transport, channel);
    }

    /// A channel was created.
    fn channel_created(&self, channel: &ChannelView) {
        let _ = channel;
    }

    /// A channel expired.
    fn channel_expired(&self, channel: &ChannelView) {
        let _ = channel;
    }

    /// A channel started streaming media.
    fn channel_started_streaming(&self, channel: &ChannelView) {
        let _ = channel;
    }
}

/// The production [`LoggingService`]: builds events, encodes them into the
/// time-series wire format and hands them to the async dispatcher.
pub struct TimeSeriesLoggingService {
    dispatcher: AsyncDispatcher,
}

impl TimeSeriesLoggingService {
    /// Constructs the service from configuration.
    ///
    /// Must be called from within a tokio runtime (the dispatcher spawns its
    /// workers here).
    ///
    /// # Errors
    /// Returns [`ConfigError::Disabled`] when the sink is switched off and
    /// [`ConfigError::MissingProperty`] when a required setting is absent;
    /// callers then simply don't install the sink.
    pub fn new(config: &TimeSeriesConfig) -> Result<Self, ConfigError> {
        if !config.enabled {
            return Err(ConfigError::Disabled);
        }
        let url = config.endpoint_url()?;
        info!(
            url_base = config.url_base.as_deref().unwrap_or(""),
            database = config.database.as_deref().unwrap_or(""),
            "initialized time-series logging service"
        );
        Ok(Self { dispatcher: AsyncDispatcher::new(url, config.queue_capacity, config.workers) })
    }

    /// Number of payloads dropped by the dispatch queue so far.
    pub fn dropped(&self) -> u64 {
        self.dispatcher.dropped()
    }

    fn emit(&self, event: Event) {
        self.dispatcher.dispatch(encoder::encode(&event));
    }
}

impl LoggingService for TimeSeriesLoggingService {
    fn log_event(&self, event: Event) {
        self.emit(event);
    }

    fn conference_created(&self, conference: &ConferenceView) {
        self.emit(factory::conference_created(&conference.id, conference.focus.as_deref()));
    }

    fn conference_expired(&self, conference: &ConferenceView) {
        self.emit(factory::conference_expired(&conference.id));
    }

    fn content_created(&self, content: &ContentView) {
        let Some(conference_id) = content.conference_id.as_deref() else {
            debug!(content = %content.name, "skipping content created event: no conference");
            return;
        };
        self.emit(factory::content_created(&content.name, conference_id));
    }

    fn content_expired(&self, content: &ContentView) {
        let Some(conference_id) = content.conference_id.as_deref() else {
            debug!(content = %content.name, "skipping content expired event: no conference");
            return;
        };
        self.emit(factory::content_expired(&content.name, conference_id));
    }

    fn endpoint_created(&self, endpoint: &EndpointView) {
        let Some(conference_id) = endpoint.conference_id.as_deref() else {
            debug!(endpoint = %endpoint.id, "skipping endpoint created event: no conference");
            return;
        };
        self.emit(factory::endpoint_created(conference_id, &endpoint.id));
    }

    fn endpoint_display_name_changed(&self, endpoint: &EndpointView) {
        let Some(conference_id) = endpoint.conference_id.as_deref() else {
            debug!(endpoint = %endpoint.id, "skipping display name event: no conference");
            return;
        };
        self.emit(factory::endpoint_display_name_changed(
            conference_id,
            &endpoint.id,
            endpoint.display_name.as_deref(),
        ));
    }

    fn transport_created(&self, transport: &TransportView) {
        let Some(conference_id) = transport.conference_id.as_deref() else {
            debug!(hash_code = transport.hash_code, "skipping transport created event: no conference");
            return;
        };
        self.emit(factory::transport_created(
            transport.hash_code,
            conference_id,
            transport.num_components,
            transport.ufrag.as_deref(),
            transport.is_controlling,
        ));
    }

    fn transport_connected(&self, transport: &TransportView) {
        let Some(conference_id) = transport.conference_id.as_deref() else {
            debug!(hash_code = transport.hash_code, "skipping transport connected event: no conference");
            return;
        };
        self.emit(factory::transport_connected(
            transport.hash_code,
            conference_id,
            &transport.selected_pairs_string(),
        ));
    }

    fn transport_state_changed(
        &self,
        transport: &TransportView,
        old_state: Option<&str>,
        new_state: Option<&str>,
    ) {
        let Some(conference_id) = transport.conference_id.as_deref() else {
            debug!(hash_code = transport.hash_code, "skipping transport state event: no conference");
            return;
        };
        self.emit(factory::transport_state_changed(
            transport.hash_code,
            conference_id,
            old_state,
            new_state,
        ));
    }

    fn transport_channel_added(&self, transport: &TransportView, channel: &ChannelView) {
        let Some(conference_id) = transport.conference_id.as_deref() else {
            debug!(channel = %channel.id, "skipping transport channel added event: no conference");
            return;
        };
        self.emit(factory::transport_channel_added(
            transport.hash_code,
            conference_id,
            &channel.id,
        ));
    }

    fn transport_channel_removed(&self, transport: &TransportView, channel: &ChannelView) {
        let Some(conference_id) = transport.conference_id.as_deref() else {
            debug!(channel = %channel.id, "skipping transport channel removed event: no conference");
            return;
        };
        self.emit(factory::transport_channel_removed(
            transport.hash_code,
            conference_id,
            &channel.id,
        ));
    }

    fn channel_created(&self, channel: &ChannelView) {
        let (Some(content_name), Some(conference_id)) =
            (channel.content_name.as_deref(), channel.conference_id.as_deref())
        else {
            debug!(channel = %channel.id, "skipping channel created event: incomplete parent chain");
            return;
        };
        self.emit(factory::channel_created(
            &channel.id,
            content_name,
            conference_id,
            channel.endpoint_id.as_deref(),
            channel.last_n.unwrap_or(-1),
        ));
    }

    fn channel_expired(&self, channel: &ChannelView) {
        let (Some(content_name), Some(conference_id)) =
            (channel.content_name.as_deref(), channel.conference_id.as_deref())
        else {
            debug!(channel = %channel.id, "skipping channel expired event: incomplete parent chain");
            return;
        };
        self.emit(factory::channel_expired(
            &channel.id,
            content_name,
            conference_id,
            channel.endpoint_id.as_deref(),
            channel.last_n.unwrap_or(-1),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeSeriesConfig;

    #[test]
    fn disabled_config_refuses_construction() {
        // `enabled` defaults to false; the flag wins over everything else.
        let err = TimeSeriesLoggingService::new(&TimeSeriesConfig::default())
            .err()
            .expect("config error");
        assert_eq!(err, ConfigError::Disabled);
    }

    #[test]
    fn construction_fails_without_required_settings() {
        // Validation runs before any worker is spawned, so no runtime needed.
        let config = TimeSeriesConfig { enabled: true, ..TimeSeriesConfig::default() };
        let err = TimeSeriesLoggingService::new(&config).err().expect("config error");
        assert_eq!(err, ConfigError::MissingProperty("timeseries.url_base"));
    }

    #[tokio::test]
    async fn incomplete_views_do_not_dispatch() {
        let config = TimeSeriesConfig {
            enabled: true,
            url_base: Some("http://127.0.0.1:1".to_owned()),
            database: Some("bridge".to_owned()),
            user: Some("u".to_owned()),
            password: Some("p".to_owned()),
            queue_capacity: 4,
            workers: 1,
        };
        let service = TimeSeriesLoggingService::new(&config).unwrap();

        // No conference id anywhere: every notification must be skipped
        // without touching the dispatcher and without panicking.
        service.content_created(&ContentView { name: "audio".to_owned(), conference_id: None });
        service.endpoint_created(&EndpointView { id: "ep1".to_owned(), ..Default::default() });
        service.channel_created(&ChannelView { id: "ch1".to_owned(), ..Default::default() });
        service.transport_created(&TransportView::default());

        assert_eq!(service.dropped(), 0);
    }
}
