//! Pure constructors mapping lifecycle signals to [`Event`] records.
//!
//! Each constructor carries a fixed, signal-specific column schema. Absent
//! optional arguments are substituted with the literal string `"null"` so the
//! wire payload never contains a null value. No side effects, no failures.

use crate::event::{Event, EventValue};

/// Columns of a "conference created" event.
pub const CONFERENCE_CREATED_COLUMNS: &[&str] = &["conference_id", "focus"];

/// Columns of a "conference expired" event.
pub const CONFERENCE_EXPIRED_COLUMNS: &[&str] = &["conference_id"];

/// Columns of "content created" and "content expired" events.
pub const CONTENT_COLUMNS: &[&str] = &["name", "conference_id"];

/// Columns of "channel created" and "channel expired" events.
pub const CHANNEL_COLUMNS: &[&str] =
    &["channel_id", "content_name", "conference_id", "endpoint_id", "lastn"];

/// Columns of a "transport created" event.
pub const TRANSPORT_CREATED_COLUMNS: &[&str] =
    &["hash_code", "conference_id", "num_components", "ufrag", "is_controlling"];

/// Columns of "transport channel added" and "removed" events.
pub const TRANSPORT_CHANNEL_COLUMNS: &[&str] = &["hash_code", "conference_id", "channel_id"];

/// Columns of a "transport connected" event.
pub const TRANSPORT_CONNECTED_COLUMNS: &[&str] = &["hash_code", "conference_id", "selected_pairs"];

/// Columns of a "transport state changed" event.
pub const TRANSPORT_STATE_CHANGED_COLUMNS: &[&str] =
    &["hash_code", "conference_id", "old_state", "new_state"];

/// Columns of an "endpoint created" event.
pub const ENDPOINT_CREATED_COLUMNS: &[&str] = &["conference_id", "endpoint_id"];

/// Columns of an "endpoint display name" event.
pub const ENDPOINT_DISPLAY_NAME_COLUMNS: &[&str] =
    &["conference_id", "endpoint_id", "display_name"];

/// Columns of a "focus created" event.
pub const FOCUS_CREATED_COLUMNS: &[&str] = &["room_jid"];

/// Columns of a "conference room" event.
pub const CONFERENCE_ROOM_COLUMNS: &[&str] = &["conference_id", "room_jid"];

/// A new conference was created. `focus` is the entity that requested it.
pub fn conference_created(conference_id: &str, focus: Option<&str>) -> Event {
    Event::new(
        "conference_created",
        CONFERENCE_CREATED_COLUMNS,
        vec![conference_id.into(), EventValue::opt_str(focus)],
    )
}

/// A conference expired.
pub fn conference_expired(conference_id: &str) -> Event {
    Event::new("conference_expired", CONFERENCE_EXPIRED_COLUMNS, vec![conference_id.into()])
}

/// A content group was created inside a conference.
pub fn content_created(name: &str, conference_id: &str) -> Event {
    Event::new("content_created", CONTENT_COLUMNS, vec![name.into(), conference_id.into()])
}

/// A content group expired.
pub fn content_expired(name: &str, conference_id: &str) -> Event {
    Event::new("content_expired", CONTENT_COLUMNS, vec![name.into(), conference_id.into()])
}

/// A channel was created.
pub fn channel_created(
    channel_id: &str,
    content_name: &str,
    conference_id: &str,
    endpoint_id: Option<&str>,
    last_n: i64,
) -> Event {
    Event::new(
        "channel_created",
        CHANNEL_COLUMNS,
        vec![
            channel_id.into(),
            content_name.into(),
            conference_id.into(),
            EventValue::opt_str(endpoint_id),
            last_n.into(),
        ],
    )
}

/// A channel expired. Shares the created schema, all five values emitted.
pub fn channel_expired(
    channel_id: &str,
    content_name: &str,
    conference_id: &str,
    endpoint_id: Option<&str>,
    last_n: i64,
) -> Event {
    Event::new(
        "channel_expired",
        CHANNEL_COLUMNS,
        vec![
            channel_id.into(),
            content_name.into(),
            conference_id.into(),
            EventValue::opt_str(endpoint_id),
            last_n.into(),
        ],
    )
}

/// A transport manager was created for a conference.
pub fn transport_created(
    hash_code: u64,
    conference_id: &str,
    num_components: u32,
    ufrag: Option<&str>,
    is_controlling: bool,
) -> Event {
    Event::new(
        "transport_created",
        TRANSPORT_CREATED_COLUMNS,
        vec![
            hash_code.to_string().into(),
            conference_id.into(),
            num_components.into(),
            EventValue::opt_str(ufrag),
            EventValue::bool_str(is_controlling),
        ],
    )
}

/// A channel was added to a transport manager.
pub fn transport_channel_added(hash_code: u64, conference_id: &str, channel_id: &str) -> Event {
    Event::new(
        "transport_channel_added",
        TRANSPORT_CHANNEL_COLUMNS,
        vec![hash_code.to_string().into(), conference_id.into(), channel_id.into()],
    )
}

/// A channel was removed from a transport manager.
pub fn transport_channel_removed(hash_code: u64, conference_id: &str, channel_id: &str) -> Event {
    Event::new(
        "transport_channel_removed",
        TRANSPORT_CHANNEL_COLUMNS,
        vec![hash_code.to_string().into(), conference_id.into(), channel_id.into()],
    )
}

/// A transport manager reached the connected state. `selected_pairs` is the
/// rendered list of selected candidate pairs, one per component.
pub fn transport_connected(hash_code: u64, conference_id: &str, selected_pairs: &str) -> Event {
    Event::new(
        "transport_connected",
        TRANSPORT_CONNECTED_COLUMNS,
        vec![hash_code.to_string().into(), conference_id.into(), selected_pairs.into()],
    )
}

/// A transport manager changed its negotiation state.
pub fn transport_state_changed(
    hash_code: u64,
    conference_id: &str,
    old_state: Option<&str>,
    new_state: Option<&str>,
) -> Event {
    Event::new(
        "transport_state_changed",
        TRANSPORT_STATE_CHANGED_COLUMNS,
        vec![
            hash_code.to_string().into(),
            conference_id.into(),
            EventValue::opt_str(old_state),
            EventValue::opt_str(new_state),
        ],
    )
}

/// An endpoint joined a conference.
pub fn endpoint_created(conference_id: &str, endpoint_id: &str) -> Event {
    Event::new(
        "endpoint_created",
        ENDPOINT_CREATED_COLUMNS,
        vec![conference_id.into(), endpoint_id.into()],
    )
}

/// An endpoint changed its display name.
pub fn endpoint_display_name_changed(
    conference_id: &str,
    endpoint_id: &str,
    display_name: Option<&str>,
) -> Event {
    Event::new(
        "endpoint_display_name",
        ENDPOINT_DISPLAY_NAME_COLUMNS,
        vec![conference_id.into(), endpoint_id.into(), EventValue::opt_str(display_name)],
    )
}

/// A focus was created for a room.
pub fn focus_created(room_jid: &str) -> Event {
    Event::new("focus_created", FOCUS_CREATED_COLUMNS, vec![room_jid.into()])
}

/// Binds a conference id to the room it serves.
pub fn conference_room(conference_id: &str, room_jid: &str) -> Event {
    Event::new(
        "conference_room",
        CONFERENCE_ROOM_COLUMNS,
        vec![conference_id.into(), room_jid.into()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventValue;

    #[test]
    fn conference_created_with_absent_focus_emits_literal_null() {
        let event = conference_created("c1", None);
        assert_eq!(event.name(), "conference_created");
        assert_eq!(event.rows()[0][1], EventValue::Str("null".to_owned()));
    }

    #[test]
    fn conference_created_keeps_focus_when_present() {
        let event = conference_created("c1", Some("focus@muc"));
        assert_eq!(event.rows()[0], vec!["c1".into(), "focus@muc".into()]);
    }

    #[test]
    fn channel_created_schema_matches_row_arity() {
        let event = channel_created("ch1", "audio", "conf1", Some("ep1"), 5);
        assert_eq!(event.columns().len(), event.rows()[0].len());
        assert_eq!(event.rows()[0][4], EventValue::Int(5));
    }

    #[test]
    fn channel_expired_emits_all_five_values() {
        let event = channel_expired("ch1", "audio", "conf1", None, -1);
        assert_eq!(event.columns(), CHANNEL_COLUMNS);
        assert_eq!(event.rows()[0].len(), 5);
        assert_eq!(event.rows()[0][3], EventValue::Str("null".to_owned()));
    }

    #[test]
    fn transport_created_renders_hash_and_flag_as_strings() {
        let event = transport_created(3735928559, "conf1", 2, Some("ufrag"), true);
        assert_eq!(event.rows()[0][0], EventValue::Str("3735928559".to_owned()));
        assert_eq!(event.rows()[0][2], EventValue::Int(2));
        assert_eq!(event.rows()[0][4], EventValue::Str("true".to_owned()));
    }

    #[test]
    fn room_events_carry_the_jid() {
        let event = focus_created("room@muc.example.com");
        assert_eq!(event.name(), "focus_created");
        assert_eq!(event.rows()[0][0], "room@muc.example.com".into());

        let event = conference_room("conf1", "room@muc.example.com");
        assert_eq!(event.columns(), CONFERENCE_ROOM_COLUMNS);
        assert_eq!(event.rows()[0], vec!["conf1".into(), "room@muc.example.com".into()]);
    }

    #[test]
    fn transport_state_changed_substitutes_missing_states() {
        let event = transport_state_changed(1, "conf1", None, Some("completed"));
        assert_eq!(event.rows()[0][2], EventValue::Str("null".to_owned()));
        assert_eq!(event.rows()[0][3], EventValue::Str("completed".to_owned()));
    }
}
