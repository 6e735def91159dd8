//! Application Wiring
//!
//! Builds the generator from configuration, reads requests from disk and
//! writes generated activities out as JSON lines.

use crate::config::Config;
use anyhow::{Context, Result};
use futures::StreamExt;
use lessonloom_core::{
    ActivityGenerator, ActivityStream, ActivityTypeCatalog, DiagramRepairService,
    GenerationClient, GenerationRequest, LLMConceptPlanner, OpenAICompatibleClient, Prompts,
};
use std::{fs, io::Write, path::Path, sync::Arc};
use tracing::info;

/// Builds an `ActivityGenerator` for the configured provider.
///
/// Diagram repair gets its own client only when `REPAIR_MODEL` differs from
/// the chat model.
pub fn build_generator(config: &Config) -> Result<ActivityGenerator> {
    let openai_config = config.openai_config()?;
    let prompts = Arc::new(match &config.prompts_path {
        Some(path) => Prompts::load(path)?,
        None => Prompts::default(),
    });

    let chat_client: Arc<dyn GenerationClient> = Arc::new(OpenAICompatibleClient::new(
        openai_config.clone(),
        config.chat_model.clone(),
    ));
    let planner = Arc::new(LLMConceptPlanner::new(chat_client.clone(), prompts.clone()));

    let mut generator = ActivityGenerator::new(
        chat_client,
        planner,
        Arc::new(ActivityTypeCatalog::builtin()),
    )
    .with_prompts(prompts.clone());

    if config.repair_model != config.chat_model {
        info!(model = %config.repair_model, "Using a separate model for diagram repair.");
        let repair_client = Arc::new(OpenAICompatibleClient::new(
            openai_config,
            config.repair_model.clone(),
        ));
        generator = generator.with_repair(DiagramRepairService::new(repair_client, prompts));
    }

    Ok(generator)
}

/// Reads a `GenerationRequest` from a JSON file, optionally overriding its
/// activity count.
pub fn load_request(path: &Path, num_activities: Option<u32>) -> Result<GenerationRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    let mut request: GenerationRequest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid generation request in {}", path.display()))?;
    if let Some(count) = num_activities {
        request.num_activities = Some(count);
    }
    Ok(request)
}

/// Writes each activity as one line of JSON as soon as it arrives.
///
/// Returns how many were written. Stops at the first error; lines already
/// written stay written.
pub async fn write_activities<W: Write>(mut activities: ActivityStream, out: &mut W) -> Result<usize> {
    let mut written = 0;
    while let Some(activity) = activities.next().await {
        let activity = activity?;
        serde_json::to_writer(&mut *out, &activity)?;
        writeln!(out)?;
        out.flush()?;
        written += 1;
    }
    Ok(written)
}
