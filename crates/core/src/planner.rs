//! Concept Planning Service
//!
//! Before any activity is streamed, the subject is broken down into an ordered
//! list of concepts, each annotated with whether a diagram would help teach it.
//! The plan is only ever used as context for the streaming call.

use crate::{
    llm_client::{ChatMessage, GenerationClient, ObjectRequest},
    prompts::Prompts,
    request::GenerationRequest,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// An ordered list of concepts to teach, prerequisites first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConceptPlan {
    pub concepts: Vec<PlannedConcept>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannedConcept {
    pub name: String,
    pub diagram_consideration: DiagramConsideration,
}

/// Whether, and how much, a concept needs a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramConsideration {
    pub is_appropriate: bool,
    /// From 0 (no value) to 10 (essential). Out-of-range scores are clamped.
    pub necessity_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_type: Option<String>,
}

impl ConceptPlan {
    /// Renders the plan as markdown context for the streaming call.
    pub fn render(&self) -> String {
        let mut out = String::from("# Concept Plan\n\nTeach these concepts in this order:\n");
        for (i, concept) in self.concepts.iter().enumerate() {
            let diagram = &concept.diagram_consideration;
            let guidance = if diagram.is_appropriate {
                match &diagram.suggested_type {
                    Some(kind) => format!(
                        "diagram recommended ({}, necessity {}/10)",
                        kind, diagram.necessity_score
                    ),
                    None => format!("diagram recommended (necessity {}/10)", diagram.necessity_score),
                }
            } else {
                "no diagram".to_string()
            };
            out.push_str(&format!("{}. {}: {}\n", i + 1, concept.name, guidance));
        }
        out
    }

    fn clamp_scores(mut self) -> Self {
        for concept in &mut self.concepts {
            let diagram = &mut concept.diagram_consideration;
            diagram.necessity_score = diagram.necessity_score.clamp(0.0, 10.0);
        }
        self
    }
}

/// Defines the contract for any service that can plan a lesson's concepts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConceptPlanner: Send + Sync {
    /// Produces the concept plan for `request`.
    ///
    /// # Arguments
    ///
    /// * `request` - The subject and user the lesson is for.
    /// * `system_context` - The instructions shared with the streaming call.
    async fn plan(&self, request: &GenerationRequest, system_context: &str) -> Result<ConceptPlan>;
}

/// An implementation of `ConceptPlanner` that asks the generation model.
///
/// Issues exactly one structured-output call. There are no retries; a failed
/// call fails the whole generation.
pub struct LLMConceptPlanner {
    client: Arc<dyn GenerationClient>,
    prompts: Arc<Prompts>,
}

impl LLMConceptPlanner {
    pub fn new(client: Arc<dyn GenerationClient>, prompts: Arc<Prompts>) -> Self {
        Self { client, prompts }
    }
}

#[async_trait]
impl ConceptPlanner for LLMConceptPlanner {
    #[instrument(name = "plan_concepts", skip_all, fields(subject = %request.subject_label()))]
    async fn plan(&self, request: &GenerationRequest, system_context: &str) -> Result<ConceptPlan> {
        let instructions = self.prompts.render("plan_concepts", &[])?;
        let object_request = ObjectRequest {
            name: "concept_plan".to_string(),
            schema: schema_for!(ConceptPlan).to_value(),
            messages: vec![
                ChatMessage::system(system_context),
                ChatMessage::user(instructions),
            ],
        };

        let response = self.client.gen_object(object_request).await?;
        let plan: ConceptPlan = serde_json::from_value::<ConceptPlan>(response)
            .context("Concept plan did not match its schema")?
            .clamp_scores();

        info!(concepts = plan.concepts.len(), "Concept plan generated");
        Ok(plan)
    }
}

/// A fixed `ConceptPlanner` for development and integration testing.
///
/// Returns one concept per requested skill, none of them needing a diagram.
pub struct StaticConceptPlanner;

#[async_trait]
impl ConceptPlanner for StaticConceptPlanner {
    async fn plan(&self, request: &GenerationRequest, _system_context: &str) -> Result<ConceptPlan> {
        Ok(ConceptPlan {
            concepts: request
                .subject
                .skills
                .iter()
                .map(|skill| PlannedConcept {
                    name: skill.name.clone(),
                    diagram_consideration: DiagramConsideration {
                        is_appropriate: false,
                        necessity_score: 0.0,
                        suggested_type: None,
                    },
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{ChatRole, MockGenerationClient};
    use anyhow::anyhow;
    use serde_json::json;

    fn planner(client: MockGenerationClient) -> LLMConceptPlanner {
        LLMConceptPlanner::new(Arc::new(client), Arc::new(Prompts::default()))
    }

    #[tokio::test]
    async fn test_llm_planner_parses_plan() {
        let mut client = MockGenerationClient::new();
        client
            .expect_gen_object()
            .withf(|request: &ObjectRequest| {
                request.name == "concept_plan"
                    && request.messages[0].role == ChatRole::System
                    && request.messages[0].content == "CONTEXT"
                    && request.schema["properties"]["concepts"].is_object()
            })
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "concepts": [
                        {"name": "Light reactions", "diagramConsideration": {
                            "isAppropriate": true, "necessityScore": 8, "suggestedType": "flowchart"
                        }},
                        {"name": "Calvin cycle", "diagramConsideration": {
                            "isAppropriate": false, "necessityScore": 2
                        }}
                    ]
                }))
            });

        let plan = planner(client)
            .plan(&GenerationRequest::for_skill("Photosynthesis"), "CONTEXT")
            .await
            .unwrap();

        assert_eq!(plan.concepts.len(), 2);
        assert_eq!(plan.concepts[0].name, "Light reactions");
        assert_eq!(
            plan.concepts[0].diagram_consideration.suggested_type.as_deref(),
            Some("flowchart")
        );
        assert!(plan.concepts[1].diagram_consideration.suggested_type.is_none());
    }

    #[tokio::test]
    async fn test_llm_planner_clamps_scores() {
        let mut client = MockGenerationClient::new();
        client.expect_gen_object().returning(|_| {
            Ok(json!({"concepts": [{"name": "X", "diagramConsideration": {
                "isAppropriate": true, "necessityScore": 42
            }}]}))
        });

        let plan = planner(client)
            .plan(&GenerationRequest::for_skill("X"), "")
            .await
            .unwrap();
        assert_eq!(plan.concepts[0].diagram_consideration.necessity_score, 10.0);
    }

    #[tokio::test]
    async fn test_llm_planner_accepts_any_numeric_score() {
        let mut client = MockGenerationClient::new();
        client.expect_gen_object().returning(|_| {
            Ok(json!({"concepts": [
                {"name": "A", "diagramConsideration": {"isAppropriate": true, "necessityScore": 300}},
                {"name": "B", "diagramConsideration": {"isAppropriate": true, "necessityScore": 7.5}},
                {"name": "C", "diagramConsideration": {"isAppropriate": false, "necessityScore": -3}}
            ]}))
        });

        let plan = planner(client)
            .plan(&GenerationRequest::for_skill("X"), "")
            .await
            .unwrap();
        let scores: Vec<f64> = plan
            .concepts
            .iter()
            .map(|c| c.diagram_consideration.necessity_score)
            .collect();
        assert_eq!(scores, vec![10.0, 7.5, 0.0]);
        assert!(plan.render().contains("A: diagram recommended (necessity 10/10)"));
        assert!(plan.render().contains("B: diagram recommended (necessity 7.5/10)"));
    }

    #[tokio::test]
    async fn test_llm_planner_propagates_errors_without_retry() {
        let mut client = MockGenerationClient::new();
        client
            .expect_gen_object()
            .times(1)
            .returning(|_| Err(anyhow!("service unavailable")));

        let err = planner(client)
            .plan(&GenerationRequest::for_skill("X"), "")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_llm_planner_rejects_malformed_plan() {
        let mut client = MockGenerationClient::new();
        client
            .expect_gen_object()
            .returning(|_| Ok(json!({"concepts": "not a list"})));

        assert!(
            planner(client)
                .plan(&GenerationRequest::for_skill("X"), "")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_static_planner_uses_skills() {
        let request = GenerationRequest::for_skill("Fractions");
        let plan = StaticConceptPlanner.plan(&request, "").await.unwrap();
        assert_eq!(plan.concepts.len(), 1);
        assert_eq!(plan.concepts[0].name, "Fractions");
    }

    #[test]
    fn test_render_lists_concepts_in_order() {
        let plan = ConceptPlan {
            concepts: vec![
                PlannedConcept {
                    name: "First".to_string(),
                    diagram_consideration: DiagramConsideration {
                        is_appropriate: true,
                        necessity_score: 7.0,
                        suggested_type: Some("sequence".to_string()),
                    },
                },
                PlannedConcept {
                    name: "Second".to_string(),
                    diagram_consideration: DiagramConsideration {
                        is_appropriate: false,
                        necessity_score: 0.0,
                        suggested_type: None,
                    },
                },
            ],
        };

        let rendered = plan.render();
        let first = rendered.find("1. First").unwrap();
        let second = rendered.find("2. Second").unwrap();
        assert!(first < second);
        assert!(rendered.contains("sequence, necessity 7/10"));
        assert!(rendered.contains("Second: no diagram"));
    }
}
