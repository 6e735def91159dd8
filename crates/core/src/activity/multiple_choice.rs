use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
A multiple-choice question with exactly one correct answer. Distractors should be \
plausible mistakes a learner might actually make, not jokes. Prefer version 0.1.0 \
so each choice can carry its own explanation.";

/// The original shape: plain string choices and the text of the correct one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceConfigV0 {
    pub question: String,
    pub answer_choices: Vec<String>,
    /// Must equal one of `answerChoices` exactly.
    pub correct_answer: String,
}

impl VersionedConfig for MultipleChoiceConfigV0 {
    const TYPE: &'static str = "multiple-choice";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerChoice {
    pub text: String,
    pub is_correct: bool,
    /// Shown after answering, explaining why this choice is right or wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceConfigV1 {
    pub question: String,
    pub answer_choices: Vec<AnswerChoice>,
}

impl VersionedConfig for MultipleChoiceConfigV1 {
    const TYPE: &'static str = "multiple-choice";
    const VERSION: &'static str = "0.1.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceResult {
    pub user_answer: String,
    pub is_correct: bool,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(MultipleChoiceConfigV0::TYPE)
        .with_version::<MultipleChoiceConfigV0>()
        .with_version::<MultipleChoiceConfigV1>()
        .with_result::<MultipleChoiceResult>()
        .with_instructions(INSTRUCTIONS)
}
