#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sitelens::annotations::{serialize_annotation_tasks, AnnotationTask};
use sitelens::backend::sqlite::SqliteBackend;
use sitelens::backend::{
    Backend, BackendError, CreatePhotoArgs, CreateProjectArgs, CreateTaskArgs, Photo, Project, ProjectTask,
    UpdatePhotoArgs, UpdateTaskArgs,
};
use sitelens::config::SyncConfig;
use sitelens::sync::SyncService;

/// Fresh in-memory store.
pub async fn sqlite_backend() -> Arc<SqliteBackend> {
    Arc::new(SqliteBackend::open("sqlite::memory:").await.unwrap())
}

pub async fn create_project(backend: &dyn Backend, name: &str) -> Project {
    backend
        .create_project(CreateProjectArgs {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
}

pub async fn create_photo(backend: &dyn Backend, project_id: &str, title: &str, tasks: &[AnnotationTask]) -> Photo {
    backend
        .create_photo(CreatePhotoArgs {
            url: format!("https://storage.test/photos/{title}.jpg"),
            title: Some(title.to_string()),
            project_id: Some(project_id.to_string()),
            tasks: Some(serialize_annotation_tasks(tasks).unwrap()),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub async fn create_photo_with_raw_tasks(backend: &dyn Backend, project_id: &str, raw: Option<&str>) -> Photo {
    backend
        .create_photo(CreatePhotoArgs {
            url: "https://storage.test/photos/raw.jpg".to_string(),
            title: None,
            project_id: Some(project_id.to_string()),
            tasks: raw.map(str::to_string),
            ..Default::default()
        })
        .await
        .unwrap()
}

/// Backend wrapper that records how often each operation is called.
pub struct CountingBackend {
    inner: Arc<dyn Backend>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl CountingBackend {
    pub fn new(inner: Arc<dyn Backend>) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
        }
    }

    fn record(&self, operation: &'static str) {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl Backend for CountingBackend {
    fn backend_type(&self) -> &str {
        self.inner.backend_type()
    }

    async fn fetch_project(&self, project_id: &str) -> Result<Option<Project>, BackendError> {
        self.record("fetch_project");
        self.inner.fetch_project(project_id).await
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>, BackendError> {
        self.record("fetch_projects");
        self.inner.fetch_projects().await
    }

    async fn create_project(&self, args: CreateProjectArgs) -> Result<Project, BackendError> {
        self.record("create_project");
        self.inner.create_project(args).await
    }

    async fn fetch_photo(&self, photo_id: &str) -> Result<Option<Photo>, BackendError> {
        self.record("fetch_photo");
        self.inner.fetch_photo(photo_id).await
    }

    async fn fetch_photos_for_project(&self, project_id: &str) -> Result<Vec<Photo>, BackendError> {
        self.record("fetch_photos_for_project");
        self.inner.fetch_photos_for_project(project_id).await
    }

    async fn create_photo(&self, args: CreatePhotoArgs) -> Result<Photo, BackendError> {
        self.record("create_photo");
        self.inner.create_photo(args).await
    }

    async fn update_photo(&self, photo_id: &str, args: UpdatePhotoArgs) -> Result<Photo, BackendError> {
        self.record("update_photo");
        self.inner.update_photo(photo_id, args).await
    }

    async fn delete_photo(&self, photo_id: &str) -> Result<(), BackendError> {
        self.record("delete_photo");
        self.inner.delete_photo(photo_id).await
    }

    async fn fetch_task(&self, task_id: &str) -> Result<Option<ProjectTask>, BackendError> {
        self.record("fetch_task");
        self.inner.fetch_task(task_id).await
    }

    async fn fetch_tasks_for_project(&self, project_id: &str) -> Result<Vec<ProjectTask>, BackendError> {
        self.record("fetch_tasks_for_project");
        self.inner.fetch_tasks_for_project(project_id).await
    }

    async fn create_task(&self, args: CreateTaskArgs) -> Result<ProjectTask, BackendError> {
        self.record("create_task");
        self.inner.create_task(args).await
    }

    async fn upsert_annotation_task(&self, args: CreateTaskArgs) -> Result<ProjectTask, BackendError> {
        self.record("upsert_annotation_task");
        self.inner.upsert_annotation_task(args).await
    }

    async fn update_task(&self, task_id: &str, args: UpdateTaskArgs) -> Result<ProjectTask, BackendError> {
        self.record("update_task");
        self.inner.update_task(task_id, args).await
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), BackendError> {
        self.record("delete_task");
        self.inner.delete_task(task_id).await
    }
}

/// Sync service over a fresh store, plus the counting wrapper it talks through.
pub async fn counted_service() -> (SyncService, Arc<CountingBackend>) {
    let counting = Arc::new(CountingBackend::new(sqlite_backend().await));
    let service = SyncService::new(counting.clone(), SyncConfig::default());
    (service, counting)
}
