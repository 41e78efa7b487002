//! Backend abstraction layer for the project data store.
//!
//! This module defines the common interface every table store must implement
//! (projects, photos and tasks), along with the backend-agnostic data types and
//! error handling shared by the sync service.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotations::{self, AnnotationTask};

pub mod factory;
pub mod sqlite;

/// Common error types for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Backend error: {0}")]
    Other(String),
}

/// Priority of a project task, stored lower-case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(BackendError::InvalidData(format!("unknown task priority '{other}'"))),
        }
    }
}

/// Workflow status of a project task. Always mirrors the `completed` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(BackendError::InvalidData(format!("unknown task status '{other}'"))),
        }
    }
}

/// Backend-agnostic project representation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Backend-agnostic photo representation.
///
/// `tasks`, `notes` and `drawings` hold the raw JSON columns; use the accessor
/// methods to read them as typed arrays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub project_id: Option<String>,
    pub tasks: Option<String>,
    pub notes: Option<String>,
    pub drawings: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Photo {
    /// Annotation tasks embedded in this photo. Malformed JSON reads as empty.
    pub fn annotation_tasks(&self) -> Vec<AnnotationTask> {
        annotations::parse_annotation_tasks(self.tasks.as_deref())
    }

    pub fn notes(&self) -> Vec<serde_json::Value> {
        annotations::parse_embedded(self.notes.as_deref(), "notes")
    }

    pub fn drawings(&self) -> Vec<serde_json::Value> {
        annotations::parse_embedded(self.drawings.as_deref(), "drawings")
    }

    /// Human-readable name used when describing tasks created from this photo.
    pub fn display_name(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => &self.id,
        }
    }
}

/// Backend-agnostic project task representation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectTask {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: String,
    pub project_id: String,
    pub photo_id: Option<String>,
    pub photo_url: Option<String>,
    pub annotation_task_id: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectTask {
    /// Whether this row was created from the given photo annotation.
    pub fn links_annotation(&self, photo_id: &str, annotation_task_id: &str) -> bool {
        self.photo_id.as_deref() == Some(photo_id) && self.annotation_task_id.as_deref() == Some(annotation_task_id)
    }

    /// The `(photo_id, annotation_task_id)` back-reference, when both are set.
    pub fn annotation_link(&self) -> Option<(&str, &str)> {
        match (self.photo_id.as_deref(), self.annotation_task_id.as_deref()) {
            (Some(photo_id), Some(annotation_id)) => Some((photo_id, annotation_id)),
            _ => None,
        }
    }
}

/// Arguments for creating a new project.
#[derive(Clone, Debug)]
pub struct CreateProjectArgs {
    pub name: String,
    pub description: Option<String>,
}

/// Arguments for creating a new photo record.
#[derive(Clone, Debug, Default)]
pub struct CreatePhotoArgs {
    pub url: String,
    pub title: Option<String>,
    pub project_id: Option<String>,
    pub tasks: Option<String>,
    pub notes: Option<String>,
    pub drawings: Option<String>,
}

/// Arguments for updating a photo record. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct UpdatePhotoArgs {
    pub title: Option<String>,
    pub tasks: Option<String>,
    pub notes: Option<String>,
    pub drawings: Option<String>,
}

/// Arguments for creating a new task.
#[derive(Clone, Debug)]
pub struct CreateTaskArgs {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: TaskPriority,
    pub category: String,
    pub project_id: String,
    pub photo_id: Option<String>,
    pub photo_url: Option<String>,
    pub annotation_task_id: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
}

/// Arguments for updating a task. `None` leaves a field unchanged.
///
/// Setting `completed` also sets the status to match.
#[derive(Clone, Debug, Default)]
pub struct UpdateTaskArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
}

/// Backend trait that every project data store must implement.
///
/// This trait defines the table operations the sync service relies on. The
/// hosted backend used by the mobile client and the local SQLite store both fit
/// behind it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the backend type identifier (e.g., "sqlite").
    fn backend_type(&self) -> &str;

    // Projects
    async fn fetch_project(&self, project_id: &str) -> Result<Option<Project>, BackendError>;
    async fn fetch_projects(&self) -> Result<Vec<Project>, BackendError>;
    async fn create_project(&self, args: CreateProjectArgs) -> Result<Project, BackendError>;

    // Photos
    async fn fetch_photo(&self, photo_id: &str) -> Result<Option<Photo>, BackendError>;
    async fn fetch_photos_for_project(&self, project_id: &str) -> Result<Vec<Photo>, BackendError>;
    async fn create_photo(&self, args: CreatePhotoArgs) -> Result<Photo, BackendError>;
    async fn update_photo(&self, photo_id: &str, args: UpdatePhotoArgs) -> Result<Photo, BackendError>;
    async fn delete_photo(&self, photo_id: &str) -> Result<(), BackendError>;

    // Tasks
    async fn fetch_task(&self, task_id: &str) -> Result<Option<ProjectTask>, BackendError>;
    async fn fetch_tasks_for_project(&self, project_id: &str) -> Result<Vec<ProjectTask>, BackendError>;
    async fn create_task(&self, args: CreateTaskArgs) -> Result<ProjectTask, BackendError>;
    /// Insert a task created from a photo annotation, or update the existing row
    /// with the same `(photo_id, annotation_task_id)`.
    async fn upsert_annotation_task(&self, args: CreateTaskArgs) -> Result<ProjectTask, BackendError>;
    async fn update_task(&self, task_id: &str, args: UpdateTaskArgs) -> Result<ProjectTask, BackendError>;
    async fn delete_task(&self, task_id: &str) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parses_any_case() {
        assert_eq!("HIGH".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!(" low ".parse::<TaskPriority>().unwrap(), TaskPriority::Low);
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_status_follows_completion() {
        assert_eq!(TaskStatus::from_completed(true), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_completed(false).as_str(), "pending");
    }

    #[test]
    fn test_photo_display_name_falls_back_to_id() {
        let mut photo = Photo {
            id: "p1".to_string(),
            url: "https://example.test/p1.jpg".to_string(),
            title: Some("  ".to_string()),
            project_id: None,
            tasks: None,
            notes: None,
            drawings: None,
            created_at: Utc::now(),
        };
        assert_eq!(photo.display_name(), "p1");
        photo.title = Some("North wall".to_string());
        assert_eq!(photo.display_name(), "North wall");
    }
}
