//! Generation Requests
//!
//! The caller-constructed description of what to teach and to whom. A request
//! is immutable once handed to the generator.

use crate::llm_client::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the generator needs to produce a lesson's activities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// What is being taught.
    pub subject: Subject,
    /// Free-text instructions that take priority over every other rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Who is being taught.
    #[serde(default)]
    pub user: UserContext,
    /// When set, exactly this many activities should be produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_activities: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub skills: Vec<SkillRef>,
    #[serde(default)]
    pub documents: Vec<SubjectDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<LessonContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Source material the activities should be grounded in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectDocument {
    pub name: String,
    pub content: String,
}

/// The lesson the activities belong to, including what the user has already seen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonContext {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub prior_activities: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

impl GenerationRequest {
    /// Creates a request teaching a single named skill with no other context.
    pub fn for_skill(name: impl Into<String>) -> Self {
        Self {
            subject: Subject {
                skills: vec![SkillRef {
                    name: name.into(),
                    emoji: None,
                }],
                ..Default::default()
            },
            special_instructions: None,
            user: UserContext::default(),
            num_activities: None,
        }
    }

    pub fn with_special_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_num_activities(mut self, count: u32) -> Self {
        self.num_activities = Some(count);
        self
    }

    pub fn with_document(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.subject.documents.push(SubjectDocument {
            name: name.into(),
            content: content.into(),
        });
        self
    }

    pub fn with_lesson(mut self, lesson: LessonContext) -> Self {
        self.subject.lesson = Some(lesson);
        self
    }

    /// A short human-readable label for logs, e.g. `"Fractions, Decimals"`.
    pub fn subject_label(&self) -> String {
        self.subject
            .skills
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ChatRole;
    use serde_json::json;

    #[test]
    fn test_for_skill_builds_minimal_request() {
        let request = GenerationRequest::for_skill("Photosynthesis");
        assert_eq!(request.subject.skills.len(), 1);
        assert_eq!(request.subject.skills[0].name, "Photosynthesis");
        assert!(request.special_instructions.is_none());
        assert!(request.num_activities.is_none());
        assert!(request.user.interests.is_empty());
    }

    #[test]
    fn test_builder_helpers() {
        let request = GenerationRequest::for_skill("Fractions")
            .with_special_instructions("Use pizza examples")
            .with_interests(["Soccer", "Cooking"])
            .with_num_activities(4)
            .with_document("notes.md", "A fraction is a part of a whole.");

        assert_eq!(
            request.special_instructions.as_deref(),
            Some("Use pizza examples")
        );
        assert_eq!(request.user.interests, vec!["Soccer", "Cooking"]);
        assert_eq!(request.num_activities, Some(4));
        assert_eq!(request.subject.documents[0].name, "notes.md");
    }

    #[test]
    fn test_deserialize_camel_case_payload() {
        let payload = json!({
            "subject": {
                "skills": [{"name": "Derivatives", "emoji": "📈"}],
                "lesson": {
                    "name": "Intro to Calculus",
                    "priorActivities": [{"type": "slide", "markdownContent": "hi"}]
                }
            },
            "specialInstructions": "Keep it short",
            "user": {
                "interests": ["Soccer"],
                "chatHistory": [{"role": "user", "content": "I like sports"}]
            },
            "numActivities": 3
        });

        let request: GenerationRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.subject.skills[0].emoji.as_deref(), Some("📈"));
        let lesson = request.subject.lesson.as_ref().unwrap();
        assert_eq!(lesson.prior_activities.len(), 1);
        assert_eq!(request.user.chat_history[0].role, ChatRole::User);
        assert_eq!(request.num_activities, Some(3));
    }

    #[test]
    fn test_missing_optional_sections_default() {
        let request: GenerationRequest =
            serde_json::from_value(json!({"subject": {"skills": [{"name": "Algebra"}]}})).unwrap();
        assert!(request.subject.documents.is_empty());
        assert!(request.user.chat_history.is_empty());
    }

    #[test]
    fn test_subject_label_joins_skills() {
        let mut request = GenerationRequest::for_skill("Fractions");
        request.subject.skills.push(SkillRef {
            name: "Decimals".to_string(),
            emoji: None,
        });
        assert_eq!(request.subject_label(), "Fractions, Decimals");
    }
}
