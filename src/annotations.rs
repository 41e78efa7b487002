//! Annotation tasks embedded in photo records.
//!
//! Photos carry their annotation tasks, notes and drawings as JSON arrays stored
//! in text columns. This module owns the typed view of those arrays: the
//! [`AnnotationTask`] model, the capitalized [`AnnotationPriority`] used on the
//! photo side, and the parsing helpers every other module goes through.
//!
//! Reading is per entry: an absent or malformed column reads as an empty list,
//! and a single unreadable entry is skipped without hiding its siblings.
//!
//! Writing goes through [`edit_annotation_task`], which rewrites one entry and
//! leaves every other entry, and every key this crate does not model, as it
//! was stored. A malformed column is never replaced.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::TaskPriority;

/// Priority as written by the photo annotation editor (`"Low"`, `"Medium"`, `"High"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationPriority {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl AnnotationPriority {
    /// The capitalized label stored in photo JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl From<AnnotationPriority> for TaskPriority {
    fn from(priority: AnnotationPriority) -> Self {
        match priority {
            AnnotationPriority::Low => TaskPriority::Low,
            AnnotationPriority::Medium => TaskPriority::Medium,
            AnnotationPriority::High => TaskPriority::High,
        }
    }
}

impl From<TaskPriority> for AnnotationPriority {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::Low => AnnotationPriority::Low,
            TaskPriority::Medium => AnnotationPriority::Medium,
            TaskPriority::High => AnnotationPriority::High,
        }
    }
}

/// A to-do item attached to a photo while annotating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationTask {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<AnnotationPriority>,
    /// Keys owned by the annotation editor, such as marker coordinates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationTask {
    /// Create an open annotation task.
    pub fn new(id: impl Into<String>, text: impl Into<String>, priority: Option<AnnotationPriority>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            priority,
            extra: Map::new(),
        }
    }
}

/// Errors from editing one entry of a photo's `tasks` column.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("malformed tasks JSON: {0}")]
    Malformed(serde_json::Error),

    #[error("annotation task {0} not found")]
    Missing(String),

    #[error("annotation task {id} is unreadable: {source}")]
    Unreadable { id: String, source: serde_json::Error },
}

/// Parse the entries of an embedded JSON array without interpreting them.
///
/// An absent or blank column is an empty array, not an error.
pub fn parse_embedded_entries(raw: Option<&str>) -> Result<Vec<Value>, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json),
    }
}

/// Parse an embedded JSON array leniently.
///
/// A malformed column reads as empty; entries that do not fit `T` are skipped.
pub fn parse_embedded<T: DeserializeOwned>(raw: Option<&str>, field: &str) -> Vec<T> {
    let entries = match parse_embedded_entries(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("⚠️  Ignoring malformed photo {field} JSON: {e}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("⚠️  Skipping unreadable photo {field} entry #{index}: {e}");
                None
            }
        })
        .collect()
}

/// Leniently parse a photo's `tasks` column.
pub fn parse_annotation_tasks(raw: Option<&str>) -> Vec<AnnotationTask> {
    parse_embedded(raw, "tasks")
}

/// Serialize annotation tasks for storage in a photo's `tasks` column.
pub fn serialize_annotation_tasks(tasks: &[AnnotationTask]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Apply `change` to the entry of a `tasks` column whose id is `annotation_id`.
///
/// Returns the new column text, or `None` when the entry already matched.
/// Only the edited entry is re-encoded; its unmodelled keys are carried over.
pub fn edit_annotation_task<F>(raw: Option<&str>, annotation_id: &str, change: F) -> Result<Option<String>, EditError>
where
    F: FnOnce(&mut AnnotationTask),
{
    let mut entries = parse_embedded_entries(raw).map_err(EditError::Malformed)?;

    let entry = entries
        .iter_mut()
        .find(|entry| entry.get("id").and_then(Value::as_str) == Some(annotation_id))
        .ok_or_else(|| EditError::Missing(annotation_id.to_string()))?;

    let unreadable = |source| EditError::Unreadable {
        id: annotation_id.to_string(),
        source,
    };
    let mut task: AnnotationTask = serde_json::from_value(entry.clone()).map_err(unreadable)?;
    let before = task.clone();
    change(&mut task);
    if task == before {
        return Ok(None);
    }

    *entry = serde_json::to_value(&task).map_err(unreadable)?;
    serde_json::to_string(&entries).map(Some).map_err(unreadable)
}
