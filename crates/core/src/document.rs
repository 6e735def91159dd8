//! The Action Stream Document
//!
//! The streaming call produces one JSON document, `{"actions": [...]}`, that
//! only ever grows. The typed structs below describe its finished shape and
//! supply the schema sent to the model; the free functions read the partial
//! snapshots observed while it is still being written, where any field may be
//! missing.

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionStreamDocument {
    pub actions: Vec<Action>,
}

/// One step of the model's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// Private reasoning. Never shown to the user.
    Think { thinking: String },
    /// A group of activities to show the user, in order.
    OutputActivities {
        activities: Vec<Value>,
        is_last_group: bool,
    },
    /// Tells the model to stop; carries no control meaning for the reader.
    Done {},
}

impl ActionStreamDocument {
    pub fn json_schema() -> Value {
        schema_for!(ActionStreamDocument).to_value()
    }
}

/// The kind of a (possibly partial) action, read from its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Think,
    OutputActivities,
    Done,
    Unknown,
}

pub fn action_kind(action: &Value) -> ActionKind {
    match action.get("type").and_then(Value::as_str) {
        Some("think") => ActionKind::Think,
        Some("outputActivities") => ActionKind::OutputActivities,
        Some("done") => ActionKind::Done,
        _ => ActionKind::Unknown,
    }
}

/// The actions present in a snapshot, in document order.
pub fn snapshot_actions(snapshot: &Value) -> &[Value] {
    snapshot
        .get("actions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Every raw activity across all `outputActivities` actions, in document order.
pub fn raw_activities(snapshot: &Value) -> Vec<&Value> {
    snapshot_actions(snapshot)
        .iter()
        .filter(|action| action_kind(action) == ActionKind::OutputActivities)
        .filter_map(|action| action.get("activities").and_then(Value::as_array))
        .flatten()
        .collect()
}

/// A canonical string for `value`: equal for structurally equal values,
/// whatever order their object keys arrived in.
pub fn content_key(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
