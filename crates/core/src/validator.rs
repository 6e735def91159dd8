//! Activity Validator
//!
//! Maps an untyped activity produced by the model onto exactly one
//! (type, version) variant of the catalog, or rejects it.

use crate::{
    activity::Activity,
    catalog::{ActivityTypeCatalog, ActivityTypeDescriptor, ConfigSchemaVersion},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A discriminated-union validator over every (type, version) in a catalog.
///
/// Candidates are tried in the catalog's declared order and the first
/// structural match wins. A raw activity without a `version` is only tried
/// against the lowest declared version of its type.
#[derive(Debug, Clone)]
pub struct ActivityValidator {
    catalog: Arc<ActivityTypeCatalog>,
}

impl ActivityValidator {
    pub fn new(catalog: Arc<ActivityTypeCatalog>) -> Self {
        Self { catalog }
    }

    /// Returns the typed activity, or `None` when nothing in the catalog matches.
    pub fn validate(&self, raw: &Value) -> Option<Activity> {
        let Some(activity_type) = raw.get("type").and_then(Value::as_str) else {
            debug!("Raw activity has no string `type` field");
            return None;
        };
        let version = match raw.get("version") {
            None | Some(Value::Null) => None,
            Some(Value::String(v)) => Some(v.as_str()),
            Some(other) => {
                debug!(activity_type, version = %other, "Raw activity has a non-string version");
                return None;
            }
        };

        for descriptor in self.catalog.iter() {
            if descriptor.activity_type != activity_type {
                continue;
            }
            for candidate in candidates(descriptor, version) {
                match candidate.parse(raw) {
                    Ok(config) => {
                        return Some(Activity {
                            activity_type: descriptor.activity_type.clone(),
                            version: candidate.version.clone(),
                            config,
                        });
                    }
                    Err(e) => {
                        debug!(
                            activity_type,
                            version = %candidate.version,
                            error = %e,
                            "Raw activity does not match schema"
                        );
                    }
                }
            }
        }

        debug!(activity_type, ?version, "No schema in the catalog matched");
        None
    }
}

/// The schema versions of `descriptor` a raw activity with `version` may match.
fn candidates<'a>(
    descriptor: &'a ActivityTypeDescriptor,
    version: Option<&'a str>,
) -> Vec<&'a ConfigSchemaVersion> {
    match version {
        Some(version) => descriptor
            .config_versions
            .iter()
            .filter(|c| c.version == version)
            .collect(),
        None => descriptor.lowest_version().into_iter().collect(),
    }
}
