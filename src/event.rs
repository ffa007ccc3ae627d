//! The structured event record handed to the time-series encoder.
//!
//! An [`Event`] is a named, schema-tagged record: an ordered list of column
//! names and one or more rows of scalar values. Events are built once by the
//! constructors in [`crate::factory`], encoded, dispatched, and dropped.

use std::fmt;

/// A scalar value inside an event row.
///
/// The wire format only carries strings and integers. Booleans are rendered
/// as the strings `"true"`/`"false"` and absent values as the literal string
/// `"null"`, never as JSON null or nested structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValue {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
}

impl EventValue {
    /// Renders an optional string, substituting the literal `"null"` when
    /// absent. The backend schema has no notion of a missing cell.
    pub fn opt_str(value: Option<&str>) -> Self {
        EventValue::Str(value.unwrap_or("null").to_owned())
    }

    /// Renders a boolean as its string form, matching the wire contract.
    pub fn bool_str(value: bool) -> Self {
        EventValue::Str(if value { "true" } else { "false" }.to_owned())
    }
}

impl From<&str> for EventValue {
    fn from(value: &str) -> Self {
        EventValue::Str(value.to_owned())
    }
}

impl From<String> for EventValue {
    fn from(value: String) -> Self {
        EventValue::Str(value)
    }
}

impl From<i64> for EventValue {
    fn from(value: i64) -> Self {
        EventValue::Int(value)
    }
}

impl From<u32> for EventValue {
    fn from(value: u32) -> Self {
        EventValue::Int(i64::from(value))
    }
}

impl fmt::Display for EventValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventValue::Str(s) => write!(f, "{}", s),
            EventValue::Int(i) => write!(f, "{}", i),
        }
    }
}

/// An immutable lifecycle event record.
///
/// Invariants (upheld by the constructors, relied on by the encoder):
/// `rows` is never empty, and every row has the same arity as `columns`.
/// The encoder does not re-validate arity; a mismatch is a producer bug.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    name: &'static str,
    columns: &'static [&'static str],
    rows: Vec<Vec<EventValue>>,
    use_local_time: bool,
}

impl Event {
    /// Creates a single-row event. Capture-time column is on by default.
    pub fn new(
        name: &'static str,
        columns: &'static [&'static str],
        values: Vec<EventValue>,
    ) -> Self {
        debug_assert_eq!(columns.len(), values.len(), "event row arity mismatch");
        Self { name, columns, rows: vec![values], use_local_time: true }
    }

    /// Creates a multi-row event. `rows` must be non-empty.
    pub fn multi_point(
        name: &'static str,
        columns: &'static [&'static str],
        rows: Vec<Vec<EventValue>>,
    ) -> Self {
        debug_assert!(!rows.is_empty(), "event must carry at least one row");
        debug_assert!(
            rows.iter().all(|r| r.len() == columns.len()),
            "event row arity mismatch"
        );
        Self { name, columns, rows, use_local_time: true }
    }

    /// Disables or enables the synthetic leading capture-time column.
    pub fn with_local_time(mut self, use_local_time: bool) -> Self {
        self.use_local_time = use_local_time;
        self
    }

    /// The measurement name used by the time-series backend.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The schema-defined column names, in order.
    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// The value rows, in order. Never empty.
    pub fn rows(&self) -> &[Vec<EventValue>] {
        &self.rows
    }

    /// Whether the encoder should prepend a capture timestamp.
    pub fn use_local_time(&self) -> bool {
        self.use_local_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_str_substitutes_literal_null() {
        assert_eq!(EventValue::opt_str(None), EventValue::Str("null".to_owned()));
        assert_eq!(EventValue::opt_str(Some("focus@example.com")), "focus@example.com".into());
    }

    #[test]
    fn bool_renders_as_string() {
        assert_eq!(EventValue::bool_str(true), "true".into());
        assert_eq!(EventValue::bool_str(false), "false".into());
    }

    #[test]
    fn single_row_event_defaults_to_local_time() {
        let event = Event::new("conference_expired", &["conference_id"], vec!["c1".into()]);
        assert!(event.use_local_time());
        assert_eq!(event.rows().len(), 1);
        assert_eq!(event.columns(), &["conference_id"]);
    }

    #[test]
    fn with_local_time_toggles_flag() {
        let event = Event::new("conference_expired", &["conference_id"], vec!["c1".into()])
            .with_local_time(false);
        assert!(!event.use_local_time());
    }

    #[test]
    fn multi_point_keeps_row_order() {
        let rows = vec![vec!["a".into()], vec!["b".into()]];
        let event = Event::multi_point("conference_expired", &["conference_id"], rows);
        assert_eq!(event.rows().len(), 2);
        assert_eq!(event.rows()[0][0], "a".into());
        assert_eq!(event.rows()[1][0], "b".into());
    }
}
