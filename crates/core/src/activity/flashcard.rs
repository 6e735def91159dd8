use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
A flashcard has a short prompt on the front and a concise answer on the back. \
Use them for vocabulary, definitions and facts worth memorising.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardConfigV0 {
    pub flashcard_front: String,
    pub flashcard_back: String,
}

impl VersionedConfig for FlashcardConfigV0 {
    const TYPE: &'static str = "flashcard";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardResult {
    /// How well the user remembered the back, from 0 (forgot) to 5 (instant).
    pub recall: u8,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(FlashcardConfigV0::TYPE)
        .with_version::<FlashcardConfigV0>()
        .with_result::<FlashcardResult>()
        .with_instructions(INSTRUCTIONS)
}
