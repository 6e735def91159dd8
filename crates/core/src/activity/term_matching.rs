use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
Term matching asks the user to pair each term with its definition. Use between \
three and six pairs whose definitions are distinguishable from one another.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermPair {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermMatchingConfigV0 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub term_pairs: Vec<TermPair>,
}

impl VersionedConfig for TermMatchingConfigV0 {
    const TYPE: &'static str = "term-matching";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermMatchingResult {
    pub user_matches: Vec<TermPair>,
    pub correct_count: u32,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(TermMatchingConfigV0::TYPE)
        .with_version::<TermMatchingConfigV0>()
        .with_result::<TermMatchingResult>()
        .with_instructions(INSTRUCTIONS)
}
