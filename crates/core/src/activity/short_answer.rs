use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
A short-answer question the user answers in a sentence or two. The grading \
instructions tell the grader what a complete answer must mention.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortAnswerConfigV0 {
    pub question_text: String,
    pub grading_instructions: String,
}

impl VersionedConfig for ShortAnswerConfigV0 {
    const TYPE: &'static str = "short-answer";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortAnswerResult {
    pub user_answer: String,
    pub score: u8,
    pub feedback: String,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(ShortAnswerConfigV0::TYPE)
        .with_version::<ShortAnswerConfigV0>()
        .with_result::<ShortAnswerResult>()
        .with_instructions(INSTRUCTIONS)
}
