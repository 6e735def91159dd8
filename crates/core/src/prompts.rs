//! Prompt Templates and Instruction Assembly
//!
//! Templates are markdown files with `{placeholder}` slots. The built-in set is
//! compiled into the crate; a deployment can override any of them by pointing
//! `Prompts::load` at a directory of `*.md` files named after the template.

use crate::{
    catalog::ActivityTypeCatalog,
    llm_client::{ChatMessage, ChatRole},
    planner::ConceptPlan,
    request::GenerationRequest,
};
use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::Path};

const GENERATE_ACTIVITIES: &str = include_str!("../prompts/generate_activities.md");
const PLAN_CONCEPTS: &str = include_str!("../prompts/plan_concepts.md");
const IMPROVE_DIAGRAMS: &str = include_str!("../prompts/improve_diagrams.md");

const BEGIN_GENERATION: &str =
    "Generate the activities now, following the concept plan and every rule above.";

/// A set of named prompt templates.
#[derive(Debug, Clone)]
pub struct Prompts {
    templates: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        let templates = [
            ("generate_activities", GENERATE_ACTIVITIES),
            ("plan_concepts", PLAN_CONCEPTS),
            ("improve_diagrams", IMPROVE_DIAGRAMS),
        ]
        .into_iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect();
        Self { templates }
    }
}

impl Prompts {
    /// Loads the built-in templates, then overrides them with every `*.md`
    /// file in `dir`, keyed by file stem.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut prompts = Self::default();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read prompts directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .context("Could not get file stem")?
                    .to_string();
                let body = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read prompt {}", path.display()))?;
                prompts.templates.insert(name, body);
            }
        }
        Ok(prompts)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Renders a template, substituting each `{key}` in one pass so that
    /// substituted text is never itself treated as a template.
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String> {
        let template = self
            .get(name)
            .with_context(|| format!("Missing prompt template: '{}'", name))?;
        Ok(substitute(template, vars))
    }
}

fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start + 1..];
        let matched = vars.iter().find(|(key, _)| {
            candidate.starts_with(key) && candidate[key.len()..].starts_with('}')
        });
        match matched {
            Some((key, value)) => {
                out.push_str(value);
                rest = &candidate[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Builds the system context shared by the planning and streaming calls.
pub fn build_system_context(
    catalog: &ActivityTypeCatalog,
    prompts: &Prompts,
    request: &GenerationRequest,
) -> Result<String> {
    let activity_types = catalog.authoring_instructions()?;
    let subject = render_subject(request)?;
    let user_context = render_user(request);
    let special_instructions = request
        .special_instructions
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("None.");
    let activity_count = match request.num_activities {
        Some(count) => format!("Produce exactly {} activities in total.", count),
        None => "Produce as many activities as the subject needs, typically between 5 and 10."
            .to_string(),
    };

    prompts.render(
        "generate_activities",
        &[
            ("activity_types", activity_types.as_str()),
            ("subject", subject.as_str()),
            ("user_context", user_context.as_str()),
            ("special_instructions", special_instructions),
            ("activity_count", activity_count.as_str()),
        ],
    )
}

/// The messages for the streaming call: the system context, the user's prior
/// conversation, the concept plan, then the instruction to begin.
pub fn generation_messages(
    system_context: &str,
    plan: &ConceptPlan,
    request: &GenerationRequest,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_context)];
    messages.extend(
        request
            .user
            .chat_history
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .cloned(),
    );
    messages.push(ChatMessage::system(plan.render()));
    messages.push(ChatMessage::user(BEGIN_GENERATION));
    messages
}

fn render_subject(request: &GenerationRequest) -> Result<String> {
    let subject = &request.subject;
    let mut out = String::from("Skills to teach:\n");
    for skill in &subject.skills {
        match &skill.emoji {
            Some(emoji) => out.push_str(&format!("- {} {}\n", emoji, skill.name)),
            None => out.push_str(&format!("- {}\n", skill.name)),
        }
    }

    if let Some(lesson) = &subject.lesson {
        out.push_str(&format!("\nThis is part of the lesson \"{}\".\n", lesson.name));
        if let Some(summary) = &lesson.summary {
            out.push_str(&format!("Lesson summary: {}\n", summary));
        }
        if !lesson.prior_activities.is_empty() {
            out.push_str(
                "\nThe user has already completed these activities. Build on them and do not repeat them:\n",
            );
            for activity in &lesson.prior_activities {
                out.push_str(&format!("- {}\n", serde_json::to_string(activity)?));
            }
        }
    }

    for document in &subject.documents {
        out.push_str(&format!(
            "\n<document name=\"{}\">\n{}\n</document>\n",
            document.name, document.content
        ));
    }
    Ok(out.trim_end().to_string())
}

fn render_user(request: &GenerationRequest) -> String {
    if request.user.interests.is_empty() {
        return "No interests recorded.".to_string();
    }
    format!("Interests: {}", request.user.interests.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        planner::{ConceptPlan, DiagramConsideration, PlannedConcept},
        request::LessonContext,
    };
    use serde_json::json;

    #[test]
    fn test_default_templates_present() {
        let prompts = Prompts::default();
        for name in ["generate_activities", "plan_concepts", "improve_diagrams"] {
            assert!(prompts.get(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_render_missing_template_errors() {
        let err = Prompts::default().render("nope", &[]).unwrap_err();
        assert!(err.to_string().contains("Missing prompt template: 'nope'"));
    }

    #[test]
    fn test_load_overrides_matching_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("plan_concepts.md"), "Custom {x}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let prompts = Prompts::load(dir.path()).unwrap();
        assert_eq!(prompts.render("plan_concepts", &[("x", "plan")]).unwrap(), "Custom plan");
        assert_eq!(prompts.get("improve_diagrams"), Some(IMPROVE_DIAGRAMS));
        assert!(prompts.get("notes").is_none());
    }

    #[test]
    fn test_load_missing_directory_errors() {
        let err = Prompts::load(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("Failed to read prompts directory"));
    }

    #[test]
    fn test_substitute_is_single_pass() {
        let out = substitute("{a} and {b} and {c}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b} and B and {c}");
    }

    #[test]
    fn test_substitute_leaves_json_braces_alone() {
        let out = substitute(r#"{"actions": [...]} {x}"#, &[("x", "X")]);
        assert_eq!(out, r#"{"actions": [...]} X"#);
    }

    #[test]
    fn test_system_context_includes_every_section() {
        let request = GenerationRequest::for_skill("Photosynthesis")
            .with_interests(["Soccer"])
            .with_special_instructions("Only use flashcards")
            .with_num_activities(4)
            .with_document("chapter.md", "Plants convert light into energy.")
            .with_lesson(LessonContext {
                name: "Plant Biology".to_string(),
                summary: Some("How plants live".to_string()),
                prior_activities: vec![json!({"type": "slide", "markdownContent": "Plants!"})],
            });

        let context =
            build_system_context(&ActivityTypeCatalog::builtin(), &Prompts::default(), &request)
                .unwrap();

        assert!(context.contains("- Photosynthesis"));
        assert!(context.contains("Interests: Soccer"));
        assert!(context.contains("Only use flashcards"));
        assert!(context.contains("Produce exactly 4 activities"));
        assert!(context.contains("Plants convert light into energy."));
        assert!(context.contains("Plant Biology"));
        assert!(context.contains("Plants!"));
        assert!(context.contains("## `teach-the-ai`"));
        assert!(context.contains("Version `0.1.0` configuration schema"));
        assert!(!context.contains("{activity_types}"));
    }

    #[test]
    fn test_system_context_defaults() {
        let context = build_system_context(
            &ActivityTypeCatalog::builtin(),
            &Prompts::default(),
            &GenerationRequest::for_skill("Algebra"),
        )
        .unwrap();
        assert!(context.contains("No interests recorded."));
        assert!(context.contains("typically between 5 and 10"));
    }

    #[test]
    fn test_generation_messages_order() {
        let mut request = GenerationRequest::for_skill("Algebra");
        request.user.chat_history = vec![
            ChatMessage::user("I find variables confusing"),
            ChatMessage::system("ignored"),
            ChatMessage::assistant("Let's fix that"),
        ];
        let plan = ConceptPlan {
            concepts: vec![PlannedConcept {
                name: "Variables".to_string(),
                diagram_consideration: DiagramConsideration {
                    is_appropriate: false,
                    necessity_score: 1.0,
                    suggested_type: None,
                },
            }],
        };

        let messages = generation_messages("SYSTEM", &plan, &request);
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0], ChatMessage::system("SYSTEM"));
        assert_eq!(messages[1].content, "I find variables confusing");
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert!(messages[3].content.contains("Variables"));
        assert_eq!(messages[4].role, ChatRole::User);
    }
}
