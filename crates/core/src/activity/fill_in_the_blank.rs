use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
Fill-in-the-blank shows a passage with some words hidden. Wrap every hidden word \
in square brackets inside `text`, list them again in `hiddenWords`, and add a few \
plausible extra words to `wordChoices`.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillInTheBlankConfigV0 {
    /// The passage, with each hidden word wrapped like `[this]`.
    pub text: String,
    pub hidden_words: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub word_choices: Vec<String>,
}

impl VersionedConfig for FillInTheBlankConfigV0 {
    const TYPE: &'static str = "fill-in-the-blank";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillInTheBlankResult {
    pub user_answers: Vec<String>,
    pub correct_count: u32,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(FillInTheBlankConfigV0::TYPE)
        .with_version::<FillInTheBlankConfigV0>()
        .with_result::<FillInTheBlankResult>()
        .with_instructions(INSTRUCTIONS)
}
