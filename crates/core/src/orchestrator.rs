//! Stream Orchestrator
//!
//! Drives one generation: plan the concepts, open a single streaming call for
//! the action document, and turn its growing snapshots into a sequence of
//! validated activities.
//!
//! An element of a growing array is only known to be complete once a later
//! sibling has started, so every snapshot settles all but the last element.
//! Snapshots redeliver the whole document, which is why "already handled" is
//! tracked by content rather than by index.

use crate::{
    activity::Activity,
    catalog::ActivityTypeCatalog,
    diagram::DiagramRepairService,
    document::{ActionStreamDocument, action_kind, content_key, raw_activities, snapshot_actions},
    llm_client::{GenerationClient, ObjectRequest},
    planner::ConceptPlanner,
    prompts::{Prompts, build_system_context, generation_messages},
    request::GenerationRequest,
    validator::ActivityValidator,
};
use anyhow::{Context, Result};
use async_stream::try_stream;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::{collections::HashSet, pin::Pin, sync::Arc};
use tracing::{debug, info, warn};

/// The activities of one generation, in document order.
///
/// Ends cleanly when the model is done, or with a single `Err` if planning,
/// the transport or a diagram repair fails. Activities already received stay
/// valid either way.
pub type ActivityStream = Pin<Box<dyn Stream<Item = Result<Activity>> + Send>>;

/// Tracks which parts of the action document have settled.
///
/// Both sets are keyed by `content_key`, so an item is handed out at most once
/// no matter how many snapshots repeat it.
#[derive(Debug, Default)]
pub struct SettleTracker {
    finished_actions: HashSet<String>,
    finished_activities: HashSet<String>,
}

impl SettleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records everything `snapshot` settles and returns the raw activities
    /// that settled for the first time, in document order.
    ///
    /// Returned activities are already marked finished, so a later failure
    /// while processing one never causes it to be handed out again.
    pub fn observe(&mut self, snapshot: &Value) -> Vec<Value> {
        if let Some((_, settled)) = snapshot_actions(snapshot).split_last() {
            for action in settled {
                if self.finished_actions.insert(content_key(action)) {
                    debug!(kind = ?action_kind(action), "Action settled");
                }
            }
        }

        let raw = raw_activities(snapshot);
        let settled = raw.split_last().map(|(_, rest)| rest).unwrap_or_default();
        settled
            .iter()
            .filter(|activity| self.finished_activities.insert(content_key(activity)))
            .map(|activity| (*activity).clone())
            .collect()
    }

    /// Settles the raw activity the not-last rule withheld, once the stream has
    /// ended and `snapshot` is known to be final.
    pub fn flush(&mut self, snapshot: &Value) -> Option<Value> {
        let raw = raw_activities(snapshot);
        let last = *raw.last()?;
        self.finished_activities
            .insert(content_key(last))
            .then(|| last.clone())
    }

    pub fn finished_actions(&self) -> usize {
        self.finished_actions.len()
    }

    pub fn finished_activities(&self) -> usize {
        self.finished_activities.len()
    }
}

/// Generates lesson activities from a request.
///
/// All collaborators are injected; two generations running at once share
/// nothing but them.
#[derive(Clone)]
pub struct ActivityGenerator {
    client: Arc<dyn GenerationClient>,
    planner: Arc<dyn ConceptPlanner>,
    catalog: Arc<ActivityTypeCatalog>,
    validator: ActivityValidator,
    prompts: Arc<Prompts>,
    repair: Option<DiagramRepairService>,
}

impl ActivityGenerator {
    /// Creates a generator using the built-in prompts and a diagram repair
    /// service backed by `client`.
    pub fn new(
        client: Arc<dyn GenerationClient>,
        planner: Arc<dyn ConceptPlanner>,
        catalog: Arc<ActivityTypeCatalog>,
    ) -> Self {
        Self {
            client,
            planner,
            validator: ActivityValidator::new(catalog.clone()),
            catalog,
            prompts: Arc::new(Prompts::default()),
            repair: None,
        }
    }

    pub fn with_prompts(mut self, prompts: Arc<Prompts>) -> Self {
        self.prompts = prompts;
        self
    }

    /// Uses `repair` instead of the default service, for example one backed by
    /// a cheaper model.
    pub fn with_repair(mut self, repair: DiagramRepairService) -> Self {
        self.repair = Some(repair);
        self
    }

    /// Starts a generation. Nothing happens until the stream is polled, and
    /// dropping it abandons the open call and any repair in flight.
    pub fn generate(&self, request: GenerationRequest) -> ActivityStream {
        Box::pin(self.clone().run(request))
    }

    fn run(self, request: GenerationRequest) -> impl Stream<Item = Result<Activity>> + Send {
        try_stream! {
            let repair = self
                .repair
                .clone()
                .unwrap_or_else(|| DiagramRepairService::new(self.client.clone(), self.prompts.clone()));

            info!(subject = %request.subject_label(), "Starting activity generation");
            let system_context = build_system_context(&self.catalog, &self.prompts, &request)?;
            let plan = self
                .planner
                .plan(&request, &system_context)
                .await
                .context("Concept planning failed")?;

            let mut snapshots = self
                .client
                .stream_object(ObjectRequest {
                    name: "action_stream".to_string(),
                    schema: ActionStreamDocument::json_schema(),
                    messages: generation_messages(&system_context, &plan, &request),
                })
                .await
                .context("Failed to open the activity stream")?;

            let mut tracker = SettleTracker::new();
            let mut last_snapshot: Option<Value> = None;
            let mut yielded = 0usize;
            let mut dropped = 0usize;

            while let Some(snapshot) = snapshots.next().await {
                let snapshot = snapshot.context("Activity stream failed")?;
                for raw in tracker.observe(&snapshot) {
                    match self.settle(&repair, raw).await? {
                        Some(activity) => {
                            yielded += 1;
                            yield activity;
                        }
                        None => dropped += 1,
                    }
                }
                last_snapshot = Some(snapshot);
            }

            if let Some(raw) = last_snapshot.as_ref().and_then(|s| tracker.flush(s)) {
                match self.settle(&repair, raw).await? {
                    Some(activity) => {
                        yielded += 1;
                        yield activity;
                    }
                    None => dropped += 1,
                }
            }

            info!(
                yielded,
                dropped,
                actions = tracker.finished_actions(),
                "Activity generation finished"
            );
        }
    }

    /// Repairs then validates one settled raw activity. A schema mismatch is
    /// `Ok(None)`; a repair failure is an error.
    async fn settle(&self, repair: &DiagramRepairService, raw: Value) -> Result<Option<Activity>> {
        let repaired = repair.repair(raw).await.context("Diagram repair failed")?;
        let activity = self.validator.validate(&repaired);
        if activity.is_none() {
            let activity_type = repaired
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<missing>");
            warn!(activity_type, "Dropping activity that matches no known schema");
        }
        Ok(activity)
    }
}
