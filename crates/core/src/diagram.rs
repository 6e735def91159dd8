//! Diagram Repair Service
//!
//! Models often produce diagram code that does not render. Before an activity
//! is validated, every string that embeds a fenced diagram block is sent back
//! through the model with instructions to fix the diagrams and nothing else.

use crate::{
    llm_client::{ChatMessage, GenerationClient, ObjectRequest},
    prompts::Prompts,
};
use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt, try_join_all};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// The fence that marks a diagram block inside markdown text.
pub const DEFAULT_DIAGRAM_MARKERS: &[&str] = &["```mermaid"];

/// The answer shape of one repair call.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ImprovedText {
    /// The full input text with only its diagram blocks changed.
    improved_text: String,
}

/// Recursively improves diagram blocks embedded anywhere in a JSON value.
#[derive(Clone)]
pub struct DiagramRepairService {
    client: Arc<dyn GenerationClient>,
    prompts: Arc<Prompts>,
    markers: Vec<String>,
}

impl DiagramRepairService {
    pub fn new(client: Arc<dyn GenerationClient>, prompts: Arc<Prompts>) -> Self {
        Self {
            client,
            prompts,
            markers: DEFAULT_DIAGRAM_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Replaces the set of fences that trigger a repair call.
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `text` contains a diagram block this service would repair.
    pub fn contains_diagram(&self, text: &str) -> bool {
        self.markers.iter().any(|marker| text.contains(marker.as_str()))
    }

    /// Returns `value` with every diagram-bearing string improved.
    ///
    /// Objects keep every key (not their order) and arrays keep their order.
    /// Siblings are repaired concurrently. A value without any diagram comes back untouched
    /// and costs no generation calls.
    pub async fn repair(&self, value: Value) -> Result<Value> {
        self.repair_value(value).await
    }

    fn repair_value(&self, value: Value) -> BoxFuture<'_, Result<Value>> {
        async move {
            match value {
                Value::String(text) if self.contains_diagram(&text) => {
                    self.improve_text(&text).await.map(Value::String)
                }
                Value::Array(items) => {
                    let repaired =
                        try_join_all(items.into_iter().map(|item| self.repair_value(item))).await?;
                    Ok(Value::Array(repaired))
                }
                Value::Object(map) => {
                    let (keys, values): (Vec<String>, Vec<Value>) = map.into_iter().unzip();
                    let repaired =
                        try_join_all(values.into_iter().map(|v| self.repair_value(v))).await?;
                    Ok(Value::Object(keys.into_iter().zip(repaired).collect::<Map<_, _>>()))
                }
                other => Ok(other),
            }
        }
        .boxed()
    }

    #[instrument(name = "improve_diagrams", skip_all, fields(chars = text.len()))]
    async fn improve_text(&self, text: &str) -> Result<String> {
        let instructions = self.prompts.render("improve_diagrams", &[])?;
        let request = ObjectRequest {
            name: "improved_text".to_string(),
            schema: schema_for!(ImprovedText).to_value(),
            messages: vec![ChatMessage::system(instructions), ChatMessage::user(text)],
        };

        let response = self.client.gen_object(request).await?;
        let improved: ImprovedText = serde_json::from_value(response)
            .context("Diagram repair returned an unexpected shape")?;
        debug!(before = text.len(), after = improved.improved_text.len(), "Diagrams improved");
        Ok(improved.improved_text)
    }
}
