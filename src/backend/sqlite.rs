//! SQLite backend implementation.
//!
//! Stores projects, photos and tasks in a local SeaORM database. This is the
//! store the CLI runs against and the one the test-suite exercises; it enforces
//! one task per photo annotation through a unique index.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveValue, IntoActiveModel};
use uuid::Uuid;

use super::{
    Backend, BackendError, CreatePhotoArgs, CreateProjectArgs, CreateTaskArgs, Photo, Project, ProjectTask,
    TaskStatus, UpdatePhotoArgs, UpdateTaskArgs,
};
use crate::entities::{photo, project, task};
use crate::repositories::{PhotoRepository, ProjectRepository, TaskRepository};
use crate::storage::LocalStorage;
use crate::utils::datetime;

/// SQLite-backed project store.
#[derive(Clone)]
pub struct SqliteBackend {
    storage: Arc<LocalStorage>,
}

fn storage_error(e: anyhow::Error) -> BackendError {
    BackendError::Storage(format!("{e:#}"))
}

fn parse_time(value: &str, field: &str) -> Result<chrono::DateTime<chrono::Utc>, BackendError> {
    datetime::parse_timestamp(value).map_err(|e| BackendError::InvalidData(format!("bad {field} '{value}': {e}")))
}

impl SqliteBackend {
    /// Create a backend over an already opened storage.
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Open the database at `database_url` and wrap it.
    pub async fn open(database_url: &str) -> anyhow::Result<Self> {
        let storage = LocalStorage::new(database_url).await?;
        Ok(Self::new(Arc::new(storage)))
    }

    /// The underlying storage, for maintenance operations.
    pub fn storage(&self) -> Arc<LocalStorage> {
        Arc::clone(&self.storage)
    }

    // Helper: Transform project row → Backend project
    fn project_from_model(model: project::Model) -> Result<Project, BackendError> {
        Ok(Project {
            created_at: parse_time(&model.created_at, "project created_at")?,
            id: model.id,
            name: model.name,
            description: model.description,
        })
    }

    // Helper: Transform photo row → Backend photo
    fn photo_from_model(model: photo::Model) -> Result<Photo, BackendError> {
        Ok(Photo {
            created_at: parse_time(&model.created_at, "photo created_at")?,
            id: model.id,
            url: model.url,
            title: model.title,
            project_id: model.project_id,
            tasks: model.tasks,
            notes: model.notes,
            drawings: model.drawings,
        })
    }

    // Helper: Transform task row → Backend task
    fn task_from_model(model: task::Model) -> Result<ProjectTask, BackendError> {
        Ok(ProjectTask {
            status: model.status.parse()?,
            priority: model.priority.parse()?,
            created_at: parse_time(&model.created_at, "task created_at")?,
            updated_at: parse_time(&model.updated_at, "task updated_at")?,
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            category: model.category,
            project_id: model.project_id,
            photo_id: model.photo_id,
            photo_url: model.photo_url,
            annotation_task_id: model.annotation_task_id,
            assigned_to: model.assigned_to,
            due_date: model.due_date,
        })
    }

    fn validate_due_date(due_date: Option<&String>) -> Result<(), BackendError> {
        match due_date {
            Some(date) if !datetime::is_valid_due_date(date) => {
                Err(BackendError::InvalidData(format!("due_date '{date}' is not YYYY-MM-DD")))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_project(&self, project_id: &str) -> Result<(), BackendError> {
        if project_id.trim().is_empty() {
            return Err(BackendError::InvalidData("project_id is required".to_string()));
        }
        ProjectRepository::get_by_id(&self.storage.conn, project_id)
            .await
            .map_err(storage_error)?
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("project {project_id}")))
    }

    fn task_active_model(args: CreateTaskArgs) -> task::ActiveModel {
        let now = datetime::now_timestamp();
        task::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            title: ActiveValue::Set(args.title),
            description: ActiveValue::Set(args.description),
            completed: ActiveValue::Set(args.completed),
            status: ActiveValue::Set(TaskStatus::from_completed(args.completed).as_str().to_string()),
            priority: ActiveValue::Set(args.priority.as_str().to_string()),
            category: ActiveValue::Set(args.category),
            project_id: ActiveValue::Set(args.project_id),
            photo_id: ActiveValue::Set(args.photo_id),
            photo_url: ActiveValue::Set(args.photo_url),
            annotation_task_id: ActiveValue::Set(args.annotation_task_id),
            assigned_to: ActiveValue::Set(args.assigned_to),
            due_date: ActiveValue::Set(args.due_date),
            created_at: ActiveValue::Set(now.clone()),
            updated_at: ActiveValue::Set(now),
        }
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn backend_type(&self) -> &str {
        "sqlite"
    }

    async fn fetch_project(&self, project_id: &str) -> Result<Option<Project>, BackendError> {
        ProjectRepository::get_by_id(&self.storage.conn, project_id)
            .await
            .map_err(storage_error)?
            .map(Self::project_from_model)
            .transpose()
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>, BackendError> {
        let projects = ProjectRepository::get_all(&self.storage.conn).await.map_err(storage_error)?;
        projects.into_iter().map(Self::project_from_model).collect()
    }

    async fn create_project(&self, args: CreateProjectArgs) -> Result<Project, BackendError> {
        if args.name.trim().is_empty() {
            return Err(BackendError::InvalidData("project name is required".to_string()));
        }

        let model = project::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            name: ActiveValue::Set(args.name),
            description: ActiveValue::Set(args.description),
            created_at: ActiveValue::Set(datetime::now_timestamp()),
        };
        let created = ProjectRepository::create(&self.storage.conn, model)
            .await
            .map_err(storage_error)?;
        debug!("Created project {}", created.id);
        Self::project_from_model(created)
    }

    async fn fetch_photo(&self, photo_id: &str) -> Result<Option<Photo>, BackendError> {
        PhotoRepository::get_by_id(&self.storage.conn, photo_id)
            .await
            .map_err(storage_error)?
            .map(Self::photo_from_model)
            .transpose()
    }

    async fn fetch_photos_for_project(&self, project_id: &str) -> Result<Vec<Photo>, BackendError> {
        let photos = PhotoRepository::get_for_project(&self.storage.conn, project_id)
            .await
            .map_err(storage_error)?;
        photos.into_iter().map(Self::photo_from_model).collect()
    }

    async fn create_photo(&self, args: CreatePhotoArgs) -> Result<Photo, BackendError> {
        if args.url.trim().is_empty() {
            return Err(BackendError::InvalidData("photo url is required".to_string()));
        }
        if let Some(project_id) = &args.project_id {
            self.ensure_project(project_id).await?;
        }

        let model = photo::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            url: ActiveValue::Set(args.url),
            title: ActiveValue::Set(args.title),
            project_id: ActiveValue::Set(args.project_id),
            tasks: ActiveValue::Set(args.tasks),
            notes: ActiveValue::Set(args.notes),
            drawings: ActiveValue::Set(args.drawings),
            created_at: ActiveValue::Set(datetime::now_timestamp()),
        };
        let created = PhotoRepository::create(&self.storage.conn, model)
            .await
            .map_err(storage_error)?;
        debug!("Created photo {}", created.id);
        Self::photo_from_model(created)
    }

    async fn update_photo(&self, photo_id: &str, args: UpdatePhotoArgs) -> Result<Photo, BackendError> {
        let existing = PhotoRepository::get_by_id(&self.storage.conn, photo_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| BackendError::NotFound(format!("photo {photo_id}")))?;

        let mut active_model: photo::ActiveModel = existing.into_active_model();
        if let Some(title) = args.title {
            active_model.title = ActiveValue::Set(Some(title));
        }
        if let Some(tasks) = args.tasks {
            active_model.tasks = ActiveValue::Set(Some(tasks));
        }
        if let Some(notes) = args.notes {
            active_model.notes = ActiveValue::Set(Some(notes));
        }
        if let Some(drawings) = args.drawings {
            active_model.drawings = ActiveValue::Set(Some(drawings));
        }

        let updated = PhotoRepository::update(&self.storage.conn, active_model)
            .await
            .map_err(storage_error)?;
        Self::photo_from_model(updated)
    }

    async fn delete_photo(&self, photo_id: &str) -> Result<(), BackendError> {
        let existing = PhotoRepository::get_by_id(&self.storage.conn, photo_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| BackendError::NotFound(format!("photo {photo_id}")))?;
        PhotoRepository::delete(&self.storage.conn, existing)
            .await
            .map_err(storage_error)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<Option<ProjectTask>, BackendError> {
        TaskRepository::get_by_id(&self.storage.conn, task_id)
            .await
            .map_err(storage_error)?
            .map(Self::task_from_model)
            .transpose()
    }

    async fn fetch_tasks_for_project(&self, project_id: &str) -> Result<Vec<ProjectTask>, BackendError> {
        let tasks = TaskRepository::get_for_project(&self.storage.conn, project_id)
            .await
            .map_err(storage_error)?;
        tasks.into_iter().map(Self::task_from_model).collect()
    }

    async fn create_task(&self, args: CreateTaskArgs) -> Result<ProjectTask, BackendError> {
        self.ensure_project(&args.project_id).await?;
        Self::validate_due_date(args.due_date.as_ref())?;

        let created = TaskRepository::create(&self.storage.conn, Self::task_active_model(args))
            .await
            .map_err(storage_error)?;
        debug!("Created task {}", created.id);
        Self::task_from_model(created)
    }

    async fn upsert_annotation_task(&self, args: CreateTaskArgs) -> Result<ProjectTask, BackendError> {
        let (photo_id, annotation_task_id) = match (args.photo_id.clone(), args.annotation_task_id.clone()) {
            (Some(photo_id), Some(annotation_task_id)) => (photo_id, annotation_task_id),
            _ => {
                return Err(BackendError::InvalidData(
                    "photo_id and annotation_task_id are required for an annotation task".to_string(),
                ))
            }
        };
        self.ensure_project(&args.project_id).await?;
        Self::validate_due_date(args.due_date.as_ref())?;
        let project_id = args.project_id.clone();

        TaskRepository::upsert_by_annotation(&self.storage.conn, Self::task_active_model(args))
            .await
            .map_err(storage_error)?;

        let stored = TaskRepository::get_by_annotation(&self.storage.conn, &project_id, &photo_id, &annotation_task_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| {
                BackendError::Storage(format!(
                    "task for photo {photo_id} annotation {annotation_task_id} missing after upsert"
                ))
            })?;
        debug!("Upserted task {} for photo {} annotation {}", stored.id, photo_id, annotation_task_id);
        Self::task_from_model(stored)
    }

    async fn update_task(&self, task_id: &str, args: UpdateTaskArgs) -> Result<ProjectTask, BackendError> {
        Self::validate_due_date(args.due_date.as_ref())?;

        let existing = TaskRepository::get_by_id(&self.storage.conn, task_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| BackendError::NotFound(format!("task {task_id}")))?;

        let mut active_model: task::ActiveModel = existing.into_active_model();
        if let Some(title) = args.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = args.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        if let Some(completed) = args.completed {
            active_model.completed = ActiveValue::Set(completed);
            active_model.status = ActiveValue::Set(TaskStatus::from_completed(completed).as_str().to_string());
        }
        if let Some(priority) = args.priority {
            active_model.priority = ActiveValue::Set(priority.as_str().to_string());
        }
        if let Some(category) = args.category {
            active_model.category = ActiveValue::Set(category);
        }
        if let Some(assigned_to) = args.assigned_to {
            active_model.assigned_to = ActiveValue::Set(Some(assigned_to));
        }
        if let Some(due_date) = args.due_date {
            active_model.due_date = ActiveValue::Set(Some(due_date));
        }
        active_model.updated_at = ActiveValue::Set(datetime::now_timestamp());

        let updated = TaskRepository::update(&self.storage.conn, active_model)
            .await
            .map_err(storage_error)?;
        Self::task_from_model(updated)
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), BackendError> {
        let existing = TaskRepository::get_by_id(&self.storage.conn, task_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| BackendError::NotFound(format!("task {task_id}")))?;
        TaskRepository::delete(&self.storage.conn, existing)
            .await
            .map_err(storage_error)
    }
}
