//! Typed Activities
//!
//! An activity is one teachable unit: a slide, a quiz question, a flashcard and
//! so on. Every activity type lives in its own submodule, which declares the
//! versioned configuration structs the model may produce, the result record
//! the grading layer stores, and the catalog descriptor tying them together.

pub mod fill_in_the_blank;
pub mod flashcard;
pub mod multiple_choice;
pub mod roleplay;
pub mod sequence;
pub mod short_answer;
pub mod slide;
pub mod teach_the_ai;
pub mod term_matching;

use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use fill_in_the_blank::FillInTheBlankConfigV0;
pub use flashcard::FlashcardConfigV0;
pub use multiple_choice::{MultipleChoiceConfigV0, MultipleChoiceConfigV1};
pub use roleplay::RoleplayConfigV0;
pub use sequence::SequenceConfigV0;
pub use short_answer::ShortAnswerConfigV0;
pub use slide::SlideConfigV0;
pub use teach_the_ai::TeachTheAiConfigV0;
pub use term_matching::TermMatchingConfigV0;

/// A configuration struct for one (type, version) pair.
///
/// `TYPE` and `VERSION` are the literal values of the `type` and `version`
/// fields a raw activity carries when it matches this struct.
pub trait VersionedConfig: DeserializeOwned + JsonSchema + Into<ActivityConfig> {
    const TYPE: &'static str;
    const VERSION: &'static str;
}

/// A validated activity. Ownership passes to the caller once it is yielded.
///
/// Serializes flat, as `{"type": ..., "version": ..., ...config}`, which is the
/// same shape the model produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub version: String,
    #[serde(flatten)]
    pub config: ActivityConfig,
}

/// The configuration of an activity, one variant per (type, version) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActivityConfig {
    SlideV0(SlideConfigV0),
    MultipleChoiceV0(MultipleChoiceConfigV0),
    MultipleChoiceV1(MultipleChoiceConfigV1),
    FlashcardV0(FlashcardConfigV0),
    TermMatchingV0(TermMatchingConfigV0),
    FillInTheBlankV0(FillInTheBlankConfigV0),
    ShortAnswerV0(ShortAnswerConfigV0),
    RoleplayV0(RoleplayConfigV0),
    TeachTheAiV0(TeachTheAiConfigV0),
    SequenceV0(SequenceConfigV0),
}

impl Activity {
    pub fn new<C: VersionedConfig>(config: C) -> Self {
        Self {
            activity_type: C::TYPE.to_string(),
            version: C::VERSION.to_string(),
            config: config.into(),
        }
    }

    /// Every string in the activity's configuration, in field order.
    ///
    /// Useful for checking what an activity talks about without caring which
    /// type it is.
    pub fn text_content(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Ok(value) = serde_json::to_value(&self.config) {
            collect_strings(&value, &mut out);
        }
        out
    }
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

macro_rules! impl_into_config {
    ($($config:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$config> for ActivityConfig {
                fn from(config: $config) -> Self {
                    ActivityConfig::$variant(config)
                }
            }
        )*
    };
}

impl_into_config! {
    SlideConfigV0 => SlideV0,
    MultipleChoiceConfigV0 => MultipleChoiceV0,
    MultipleChoiceConfigV1 => MultipleChoiceV1,
    FlashcardConfigV0 => FlashcardV0,
    TermMatchingConfigV0 => TermMatchingV0,
    FillInTheBlankConfigV0 => FillInTheBlankV0,
    ShortAnswerConfigV0 => ShortAnswerV0,
    RoleplayConfigV0 => RoleplayV0,
    TeachTheAiConfigV0 => TeachTheAiV0,
    SequenceConfigV0 => SequenceV0,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_activity_serializes_flat() {
        let activity = Activity::new(FlashcardConfigV0 {
            flashcard_front: "Mitochondria".to_string(),
            flashcard_back: "The powerhouse of the cell".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&activity).unwrap(),
            json!({
                "type": "flashcard",
                "version": "0.0.0",
                "flashcardFront": "Mitochondria",
                "flashcardBack": "The powerhouse of the cell"
            })
        );
    }

    #[test]
    fn test_text_content_collects_nested_strings() {
        let activity = Activity::new(TermMatchingConfigV0 {
            instructions: Some("Match them".to_string()),
            term_pairs: vec![term_matching::TermPair {
                term: "Goal".to_string(),
                definition: "Ball crosses the line".to_string(),
            }],
        });

        let text = activity.text_content();
        assert!(text.contains(&"Match them".to_string()));
        assert!(text.contains(&"Goal".to_string()));
        assert!(text.contains(&"Ball crosses the line".to_string()));
    }
}
