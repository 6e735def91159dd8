//! Turns a token stream into whole-document snapshots.
//!
//! Providers deliver structured output as raw text fragments. The orchestrator
//! wants the other delivery model: repeated full snapshots of the document,
//! each at least as complete as the one before. This adapter is the only place
//! that knows the difference.

use crate::{llm_client::SnapshotStream, partial_json::parse_partial};
use anyhow::{Context, Result};
use async_stream::try_stream;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::debug;

/// Accumulates text fragments and re-parses the growing buffer after each one,
/// emitting a snapshot whenever the parsed document changed.
///
/// Once the fragments run out the buffer must be valid JSON. If it is not, the
/// stream ends with an error, so a cut-off document is never treated as final.
pub fn snapshots_from_chunks<S>(chunks: S) -> SnapshotStream
where
    S: Stream<Item = Result<String>> + Send + 'static,
{
    Box::pin(accumulate(chunks))
}

fn accumulate<S>(chunks: S) -> impl Stream<Item = Result<Value>> + Send
where
    S: Stream<Item = Result<String>> + Send + 'static,
{
    try_stream! {
        let mut chunks = Box::pin(chunks);
        let mut buffer = String::new();
        let mut last: Option<Value> = None;

        while let Some(chunk) = chunks.next().await {
            buffer.push_str(&chunk?);
            if let Some(snapshot) = parse_partial(&buffer) {
                if last.as_ref() != Some(&snapshot) {
                    last = Some(snapshot.clone());
                    yield snapshot;
                }
            }
        }

        let complete: Value = serde_json::from_str(&buffer).with_context(|| {
            format!("Structured stream ended with incomplete JSON after {} bytes", buffer.len())
        })?;
        if last.as_ref() != Some(&complete) {
            yield complete;
        }
        debug!(bytes = buffer.len(), "Structured stream completed");
    }
}
