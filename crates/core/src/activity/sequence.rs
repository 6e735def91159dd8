use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
A sequence asks the user to put items in order. List `items` in the correct \
order; they are shuffled before being shown.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequenceItem {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequenceConfigV0 {
    pub prompt: String,
    /// Items in their correct order.
    pub items: Vec<SequenceItem>,
    /// Optional labels for the ends of the order, e.g. `["Earliest", "Latest"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_labels: Option<Vec<String>>,
}

impl VersionedConfig for SequenceConfigV0 {
    const TYPE: &'static str = "sequence";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequenceResult {
    pub user_order: Vec<String>,
    pub correct_positions: u32,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(SequenceConfigV0::TYPE)
        .with_version::<SequenceConfigV0>()
        .with_result::<SequenceResult>()
        .with_instructions(INSTRUCTIONS)
}
