//! Photo-task synchronization service.
//!
//! This module provides the [`SyncService`] struct which keeps the annotation
//! tasks embedded in a photo record consistent with the rows of a project's
//! `tasks` table, in both directions:
//!
//! - annotation → row: creating or refreshing the project task that mirrors an
//!   annotation task ([`SyncService::sync_photo_task`],
//!   [`SyncService::sync_all_photo_tasks`])
//! - row → annotation: flipping completion or priority on a project task and
//!   writing the change back into the photo's JSON
//!   ([`SyncService::update_task_completion`], [`SyncService::update_task_priority`])
//!
//! The two sides live in different stores and no transaction spans them. A
//! failure after the first write leaves them diverged until the next sync
//! touches the same task.

pub mod photos;
pub mod tasks;

use std::sync::Arc;

use crate::backend::{Backend, BackendError};
use crate::config::SyncConfig;

/// Errors returned by the sync service.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Missing or empty input, raised before any backend call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced photo or task does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Failure reported by the backend or the embedded JSON codec.
    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for SyncError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::NotFound(what) => Self::NotFound {
                kind: "resource",
                id: what,
            },
            other => Self::Backend(other),
        }
    }
}

impl SyncError {
    pub(crate) fn photo_not_found(photo_id: &str) -> Self {
        Self::NotFound {
            kind: "photo",
            id: photo_id.to_string(),
        }
    }

    pub(crate) fn task_not_found(task_id: &str) -> Self {
        Self::NotFound {
            kind: "task",
            id: task_id.to_string(),
        }
    }
}

/// Service that reconciles photo annotation tasks with project task rows.
///
/// The service is cheap to clone; clones share the same backend.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use sitelens::annotations::{AnnotationPriority, AnnotationTask};
/// use sitelens::backend::sqlite::SqliteBackend;
/// use sitelens::config::SyncConfig;
/// use sitelens::sync::SyncService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let backend = SqliteBackend::open("sqlite::memory:").await?;
/// let sync_service = SyncService::new(Arc::new(backend), SyncConfig::default());
///
/// let annotation = AnnotationTask::new("a1", "Fix door", Some(AnnotationPriority::High));
/// let task = sync_service.sync_photo_task("p1", &annotation, "proj1").await?;
/// sync_service.update_task_completion(&task.id, true).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SyncService {
    backend: Arc<dyn Backend>,
    config: SyncConfig,
}

impl SyncService {
    /// Creates a new `SyncService` over the given backend.
    pub fn new(backend: Arc<dyn Backend>, config: SyncConfig) -> Self {
        Self { backend, config }
    }

    /// The backend this service writes to.
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Defaults applied to tasks created from annotations.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

/// Reject blank identifiers before touching the backend.
pub(crate) fn require_id(value: &str, field: &str) -> Result<(), SyncError> {
    if value.trim().is_empty() {
        Err(SyncError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
