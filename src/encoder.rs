//! Serialization of [`Event`]s into the time-series backend's wire format.
//!
//! The backend accepts a JSON array holding exactly one object:
//!
//! ```json
//! [{"name": "series_name",
//!   "columns": ["time", "column1", "column2"],
//!   "points": [[1234567890123, "value1", 5]]}]
//! ```
//!
//! When the event asks for local time, a `"time"` column is prepended and
//! every point starts with the capture timestamp in milliseconds since epoch.
//! The timestamp is captured once per event so all points of a multi-point
//! payload carry a coherent time.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use crate::event::{Event, EventValue};

/// Encodes an event into the wire payload string, capturing the timestamp now.
pub fn encode(event: &Event) -> String {
    encode_at(event, current_millis()).to_string()
}

/// Encodes an event against an explicit capture timestamp.
///
/// Arity between columns and rows is not validated here; the event
/// constructors uphold it.
pub fn encode_at(event: &Event, timestamp_ms: u64) -> Value {
    let mut columns: Vec<Value> = Vec::with_capacity(event.columns().len() + 1);
    if event.use_local_time() {
        columns.push(json!("time"));
    }
    columns.extend(event.columns().iter().map(|c| json!(c)));

    let points: Vec<Value> = event
        .rows()
        .iter()
        .map(|row| {
            let mut point: Vec<Value> = Vec::with_capacity(row.len() + 1);
            if event.use_local_time() {
                point.push(json!(timestamp_ms));
            }
            point.extend(row.iter().map(value_to_json));
            Value::Array(point)
        })
        .collect();

    json!([{
        "name": event.name(),
        "columns": columns,
        "points": points,
    }])
}

fn value_to_json(value: &EventValue) -> Value {
    match value {
        EventValue::Str(s) => json!(s),
        EventValue::Int(i) => json!(i),
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}
