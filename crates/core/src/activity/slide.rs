use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
A slide presents information in markdown. Keep each slide focused on a single idea. \
Use headings, short paragraphs and lists. When a process, structure or relationship \
is easier to see than to read, include a ```mermaid diagram.";

/// A single page of markdown content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideConfigV0 {
    /// One emoji representing the slide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub markdown_content: String,
}

impl VersionedConfig for SlideConfigV0 {
    const TYPE: &'static str = "slide";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlideResult {
    pub viewed: bool,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(SlideConfigV0::TYPE)
        .with_version::<SlideConfigV0>()
        .with_result::<SlideResult>()
        .with_instructions(INSTRUCTIONS)
}
