//! Read-only views over the external session model.
//!
//! The pipeline never owns conferences, channels or transports; the session
//! model drives the notification methods and hands over snapshots of the
//! fields the telemetry needs. Nullable fields are `Option`s here, validated
//! once at the facade boundary instead of per-call null chains.

use std::fmt;
use std::sync::Arc;

/// Snapshot of a conference at the moment of a lifecycle transition.
#[derive(Debug, Clone, Default)]
pub struct ConferenceView {
    /// Conference identifier.
    pub id: String,
    /// The entity which requested the conference, if known.
    pub focus: Option<String>,
}

/// Snapshot of a content group.
#[derive(Debug, Clone, Default)]
pub struct ContentView {
    /// Content name, unique within its conference.
    pub name: String,
    /// Identifier of the parent conference.
    pub conference_id: Option<String>,
}

/// Snapshot of a channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelView {
    /// Channel identifier.
    pub id: String,
    /// Name of the parent content group.
    pub content_name: Option<String>,
    /// Identifier of the parent conference.
    pub conference_id: Option<String>,
    /// Identifier of the channel's endpoint, when bound.
    pub endpoint_id: Option<String>,
    /// The last-n value; -1 when the channel has no such notion.
    pub last_n: Option<i64>,
    /// Remote transport address once the channel is streaming.
    pub remote_address: Option<String>,
}

/// Snapshot of an endpoint.
#[derive(Debug, Clone, Default)]
pub struct EndpointView {
    /// Endpoint identifier.
    pub id: String,
    /// Identifier of the parent conference.
    pub conference_id: Option<String>,
    /// Current display name, if set.
    pub display_name: Option<String>,
}

/// A selected ICE candidate pair, one per transport component.
#[derive(Debug, Clone)]
pub struct CandidatePairView {
    /// Local transport address.
    pub local: String,
    /// Remote transport address.
    pub remote: String,
}

impl fmt::Display for CandidatePairView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.local, self.remote)
    }
}

/// Snapshot of a transport manager.
#[derive(Debug, Clone, Default)]
pub struct TransportView {
    /// Stable identity of the transport manager object.
    pub hash_code: u64,
    /// Identifier of the parent conference.
    pub conference_id: Option<String>,
    /// Number of negotiated components.
    pub num_components: u32,
    /// Local ufrag of the agent, if available.
    pub ufrag: Option<String>,
    /// Whether the local agent has the controlling role.
    pub is_controlling: bool,
    /// Selected candidate pairs, populated once connected.
    pub selected_pairs: Vec<CandidatePairView>,
}

impl TransportView {
    /// Renders the selected pairs the way the backend stores them:
    /// `local -> remote; ` per component.
    pub fn selected_pairs_string(&self) -> String {
        let mut out = String::new();
        for pair in &self.selected_pairs {
            out.push_str(&pair.to_string());
            out.push_str("; ");
        }
        out
    }
}

/// Root of the live session tree, used only for derived-metric counting.
///
/// Implementations return point-in-time snapshots; the tree may mutate while
/// a traversal is in flight, so counts are approximate under concurrency.
pub trait SessionModel: Send + Sync {
    /// All conferences currently known to the bridge, expired ones included.
    fn conferences(&self) -> Vec<Arc<dyn ConferenceRef>>;
}

/// Read-only handle to a live conference.
pub trait ConferenceRef: Send + Sync {
    /// The conference identifier.
    fn id(&self) -> String;
    /// Whether the conference has been expired.
    fn expired(&self) -> bool;
    /// The conference's content groups.
    fn contents(&self) -> Vec<Arc<dyn ContentRef>>;
}

/// Read-only handle to a content group.
pub trait ContentRef: Send + Sync {
    /// The content name.
    fn name(&self) -> String;
    /// Whether the content has been expired.
    fn expired(&self) -> bool;
    /// The content's channels.
    fn channels(&self) -> Vec<Arc<dyn ChannelRef>>;
}

/// Read-only handle to a channel.
pub trait ChannelRef: Send + Sync {
    /// The channel identifier.
    fn id(&self) -> String;
    /// Whether the channel has been expired.
    fn expired(&self) -> bool;
}
