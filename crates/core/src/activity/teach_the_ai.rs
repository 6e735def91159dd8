use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
In teach-the-ai the user explains the concept to a curious AI character who asks \
follow-up questions. `aiInstructions` tells the character what it does not yet \
understand and which misconceptions to voice.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeachTheAiSetting {
    pub emoji: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeachTheAiConfigV0 {
    pub ai_instructions: String,
    pub setting: TeachTheAiSetting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_context: Option<String>,
}

impl VersionedConfig for TeachTheAiConfigV0 {
    const TYPE: &'static str = "teach-the-ai";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeachTheAiResult {
    pub concepts_explained: Vec<String>,
    pub feedback: String,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(TeachTheAiConfigV0::TYPE)
        .with_version::<TeachTheAiConfigV0>()
        .with_result::<TeachTheAiResult>()
        .with_instructions(INSTRUCTIONS)
}
