//! Activity Type Catalog
//!
//! The registry of activity types the generator may produce. Each descriptor
//! carries the type's versioned configuration schemas, its result schema and
//! optional authoring instructions. The catalog is handed to the generator and
//! validator explicitly so tests can run against a synthetic one.

use crate::activity::{self, ActivityConfig, VersionedConfig};
use schemars::{JsonSchema, schema_for};
use serde_json::Value;
use std::cmp::Ordering;

/// Parses a raw activity into one specific configuration variant.
pub type ConfigParser = fn(&Value) -> Result<ActivityConfig, serde_json::Error>;

fn parse_as<C: VersionedConfig>(raw: &Value) -> Result<ActivityConfig, serde_json::Error> {
    C::deserialize(raw).map(Into::into)
}

/// One schema version of an activity type's configuration.
#[derive(Debug, Clone)]
pub struct ConfigSchemaVersion {
    pub version: String,
    /// JSON Schema of the configuration fields, shown to the model.
    pub schema: Value,
    parser: ConfigParser,
}

impl ConfigSchemaVersion {
    pub fn of<C: VersionedConfig>() -> Self {
        Self {
            version: C::VERSION.to_string(),
            schema: schema_for!(C).to_value(),
            parser: parse_as::<C>,
        }
    }

    pub fn parse(&self, raw: &Value) -> Result<ActivityConfig, serde_json::Error> {
        (self.parser)(raw)
    }
}

/// Describes one pluggable activity type.
#[derive(Debug, Clone)]
pub struct ActivityTypeDescriptor {
    pub activity_type: String,
    /// Configuration schemas in declared order.
    pub config_versions: Vec<ConfigSchemaVersion>,
    pub result_schema: Option<Value>,
    pub instructions: Option<String>,
}

impl ActivityTypeDescriptor {
    pub fn new(activity_type: impl Into<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            config_versions: Vec::new(),
            result_schema: None,
            instructions: None,
        }
    }

    pub fn with_version<C: VersionedConfig>(mut self) -> Self {
        debug_assert_eq!(C::TYPE, self.activity_type);
        self.config_versions.push(ConfigSchemaVersion::of::<C>());
        self
    }

    pub fn with_result<R: JsonSchema>(mut self) -> Self {
        self.result_schema = Some(schema_for!(R).to_value());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// The version a raw activity without a `version` field defaults to.
    pub fn lowest_version(&self) -> Option<&ConfigSchemaVersion> {
        self.config_versions
            .iter()
            .min_by(|a, b| compare_versions(&a.version, &b.version))
    }
}

/// Orders `major.minor.patch` strings numerically. Unparseable versions sort last.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn parse_version(version: &str) -> Option<(u64, u64, u64)> {
    let mut parts = version.split('.').map(|p| p.parse::<u64>().ok());
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    let patch = parts.next().unwrap_or(Some(0))?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

/// An ordered registry of activity type descriptors.
#[derive(Debug, Clone)]
pub struct ActivityTypeCatalog {
    descriptors: Vec<ActivityTypeDescriptor>,
}

impl ActivityTypeCatalog {
    pub fn new(descriptors: Vec<ActivityTypeDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Every built-in activity type, in declared order.
    pub fn builtin() -> Self {
        Self::new(vec![
            activity::slide::descriptor(),
            activity::multiple_choice::descriptor(),
            activity::flashcard::descriptor(),
            activity::term_matching::descriptor(),
            activity::fill_in_the_blank::descriptor(),
            activity::short_answer::descriptor(),
            activity::roleplay::descriptor(),
            activity::teach_the_ai::descriptor(),
            activity::sequence::descriptor(),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityTypeDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, activity_type: &str) -> Option<&ActivityTypeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.activity_type == activity_type)
    }

    /// The lowest declared version of `activity_type`, if the type is known.
    pub fn lowest_version(&self, activity_type: &str) -> Option<&str> {
        self.get(activity_type)?
            .lowest_version()
            .map(|v| v.version.as_str())
    }

    /// Markdown describing every type for the model: its instructions and the
    /// JSON Schema of each configuration version, in declared order.
    pub fn authoring_instructions(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for descriptor in &self.descriptors {
            out.push_str(&format!("## `{}`\n\n", descriptor.activity_type));
            if let Some(instructions) = &descriptor.instructions {
                out.push_str(instructions);
                out.push_str("\n\n");
            }
            for version in &descriptor.config_versions {
                out.push_str(&format!(
                    "Version `{}` configuration schema:\n```json\n{}\n```\n\n",
                    version.version,
                    serde_json::to_string(&version.schema)?
                ));
            }
        }
        Ok(out.trim_end().to_string())
    }

    pub fn types(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .map(|d| d.activity_type.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for ActivityTypeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
