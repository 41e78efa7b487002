use log::{debug, error, info, warn};

use crate::annotations::AnnotationTask;
use crate::backend::{BackendError, CreateTaskArgs, Photo, ProjectTask, TaskPriority, UpdateTaskArgs};
use crate::constants::PHOTO_TASK_DESCRIPTION_PREFIX;
use crate::sync::{require_id, SyncError, SyncService};

fn backend_failure(context: &str, e: BackendError) -> SyncError {
    error!("❌ {context}: {e}");
    SyncError::from(e)
}

impl SyncService {
    /// Creates or refreshes the project task that mirrors one annotation task.
    ///
    /// The project's task list is scanned for a row linked to
    /// `(photo_id, annotation_task.id)`. A match has its title, completion,
    /// status and priority overwritten from the annotation; otherwise a new row
    /// is created through the backend's idempotent annotation upsert.
    ///
    /// # Errors
    /// - [`SyncError::Validation`] if `photo_id`, `project_id` or the annotation
    ///   id is blank (no backend call is made)
    /// - [`SyncError::NotFound`] if the photo does not exist
    /// - [`SyncError::Backend`] if a backend call fails
    pub async fn sync_photo_task(
        &self,
        photo_id: &str,
        annotation_task: &AnnotationTask,
        project_id: &str,
    ) -> Result<ProjectTask, SyncError> {
        require_id(photo_id, "photo_id")?;
        require_id(project_id, "project_id")?;
        require_id(&annotation_task.id, "annotation task id")?;

        info!(
            "🔄 Syncing annotation {} of photo {} into project {}",
            annotation_task.id, photo_id, project_id
        );

        let photo = self.load_photo(photo_id).await?;
        let existing = self
            .backend
            .fetch_tasks_for_project(project_id)
            .await
            .map_err(|e| backend_failure("Failed to fetch project tasks", e))?;

        self.reconcile_annotation(&photo, annotation_task, project_id, &existing)
            .await
    }

    /// Sets completion on a project task and mirrors it into the source photo.
    ///
    /// The row's `completed` and `status` are updated first. If the row links
    /// back to a photo annotation, the photo's embedded task is flipped too;
    /// failures on that second step are logged and do not undo the row update.
    ///
    /// # Errors
    /// - [`SyncError::Validation`] if `task_id` is blank
    /// - [`SyncError::NotFound`] if the task does not exist
    /// - [`SyncError::Backend`] if the task update fails
    pub async fn update_task_completion(&self, task_id: &str, completed: bool) -> Result<ProjectTask, SyncError> {
        require_id(task_id, "task_id")?;

        let args = UpdateTaskArgs {
            completed: Some(completed),
            ..Default::default()
        };
        let task = self.update_task_row(task_id, args).await?;
        info!("✅ Task {} marked {}", task.id, task.status);

        if let Some((photo_id, annotation_id)) = task.annotation_link() {
            let result = self
                .mirror_to_photo(photo_id, annotation_id, |annotation| {
                    annotation.completed = completed;
                })
                .await;
            if let Err(e) = result {
                warn!("⚠️  Task {} updated but photo {} was not: {e}", task.id, photo_id);
            }
        }

        Ok(task)
    }

    /// Sets priority on a project task and mirrors it into the source photo.
    ///
    /// Same consistency rules as [`SyncService::update_task_completion`].
    pub async fn update_task_priority(&self, task_id: &str, priority: TaskPriority) -> Result<ProjectTask, SyncError> {
        require_id(task_id, "task_id")?;

        let args = UpdateTaskArgs {
            priority: Some(priority),
            ..Default::default()
        };
        let task = self.update_task_row(task_id, args).await?;
        info!("✅ Task {} priority set to {}", task.id, task.priority);

        if let Some((photo_id, annotation_id)) = task.annotation_link() {
            let result = self
                .mirror_to_photo(photo_id, annotation_id, |annotation| {
                    annotation.priority = Some(priority.into());
                })
                .await;
            if let Err(e) = result {
                warn!("⚠️  Task {} updated but photo {} was not: {e}", task.id, photo_id);
            }
        }

        Ok(task)
    }

    /// Reconciles every annotation task of a photo with the project's tasks.
    ///
    /// Annotations are processed one at a time, in array order. Existing rows
    /// only get their completion reconciled; missing rows are created. Returns
    /// one task per processed annotation. A photo without (or with unreadable)
    /// annotation JSON yields an empty list.
    ///
    /// # Errors
    /// - [`SyncError::Validation`] if `photo_id` or `project_id` is blank
    /// - [`SyncError::NotFound`] if the photo does not exist
    /// - [`SyncError::Backend`] on the first failing backend call; rows written
    ///   before the failure stay written
    pub async fn sync_all_photo_tasks(&self, photo_id: &str, project_id: &str) -> Result<Vec<ProjectTask>, SyncError> {
        require_id(photo_id, "photo_id")?;
        require_id(project_id, "project_id")?;

        let photo = self.load_photo(photo_id).await?;
        let annotations = photo.annotation_tasks();
        if annotations.is_empty() {
            info!("📷 Photo {} has no annotation tasks to sync", photo_id);
            return Ok(Vec::new());
        }

        info!(
            "🔄 Syncing {} annotation task(s) of photo {} into project {}",
            annotations.len(),
            photo_id,
            project_id
        );

        let mut existing = self
            .backend
            .fetch_tasks_for_project(project_id)
            .await
            .map_err(|e| backend_failure("Failed to fetch project tasks", e))?;

        let mut synced = Vec::with_capacity(annotations.len());
        for annotation in &annotations {
            if annotation.id.trim().is_empty() {
                warn!("⚠️  Skipping annotation task without id on photo {}", photo_id);
                continue;
            }

            let linked = existing
                .iter()
                .position(|task| task.links_annotation(&photo.id, &annotation.id));

            let task = match linked {
                Some(index) if existing[index].completed != annotation.completed => {
                    let updated = self
                        .update_task_completion(&existing[index].id, annotation.completed)
                        .await?;
                    existing[index] = updated.clone();
                    updated
                }
                Some(index) => {
                    debug!("Task {} already matches annotation {}", existing[index].id, annotation.id);
                    existing[index].clone()
                }
                None => {
                    let created = self.create_from_annotation(&photo, annotation, project_id).await?;
                    // Later duplicates of the same annotation id resolve to this row
                    existing.push(created.clone());
                    created
                }
            };
            synced.push(task);
        }

        info!("✅ Synced {} task(s) for photo {}", synced.len(), photo_id);
        Ok(synced)
    }

    /// Runs [`SyncService::sync_all_photo_tasks`] for every photo of a project.
    ///
    /// Photos that fail are logged and skipped.
    pub async fn sync_photo_tasks_for_project(&self, project_id: &str) -> Result<Vec<ProjectTask>, SyncError> {
        require_id(project_id, "project_id")?;

        let photos = self
            .backend
            .fetch_photos_for_project(project_id)
            .await
            .map_err(|e| backend_failure("Failed to fetch project photos", e))?;
        info!("📷 Syncing {} photo(s) of project {}", photos.len(), project_id);

        let mut synced = Vec::new();
        for photo in photos {
            match self.sync_all_photo_tasks(&photo.id, project_id).await {
                Ok(tasks) => synced.extend(tasks),
                Err(e) => error!("❌ Failed to sync photo {}: {e}", photo.id),
            }
        }
        Ok(synced)
    }

    async fn reconcile_annotation(
        &self,
        photo: &Photo,
        annotation: &AnnotationTask,
        project_id: &str,
        existing: &[ProjectTask],
    ) -> Result<ProjectTask, SyncError> {
        match existing
            .iter()
            .find(|task| task.links_annotation(&photo.id, &annotation.id))
        {
            Some(task) => {
                debug!("Found task {} for annotation {}", task.id, annotation.id);
                let args = UpdateTaskArgs {
                    title: Some(annotation.text.clone()),
                    completed: Some(annotation.completed),
                    priority: annotation.priority.map(TaskPriority::from),
                    ..Default::default()
                };
                let updated = self.update_task_row(&task.id, args).await?;
                info!("✅ Updated task {} from annotation {}", updated.id, annotation.id);
                Ok(updated)
            }
            None => self.create_from_annotation(photo, annotation, project_id).await,
        }
    }

    async fn create_from_annotation(
        &self,
        photo: &Photo,
        annotation: &AnnotationTask,
        project_id: &str,
    ) -> Result<ProjectTask, SyncError> {
        if let Some(owner) = photo.project_id.as_deref().filter(|owner| *owner != project_id) {
            warn!(
                "⚠️  Photo {} belongs to project {} but its task is created in {}",
                photo.id, owner, project_id
            );
        }

        let args = CreateTaskArgs {
            title: annotation.text.clone(),
            description: Some(format!("{} {}", PHOTO_TASK_DESCRIPTION_PREFIX, photo.display_name())),
            completed: annotation.completed,
            priority: annotation
                .priority
                .map(TaskPriority::from)
                .unwrap_or(self.config.default_priority),
            category: self.config.default_category.clone(),
            project_id: project_id.to_string(),
            photo_id: Some(photo.id.clone()),
            photo_url: Some(photo.url.clone()),
            annotation_task_id: Some(annotation.id.clone()),
            assigned_to: None,
            due_date: None,
        };

        let created = self
            .backend
            .upsert_annotation_task(args)
            .await
            .map_err(|e| backend_failure("Failed to create task from annotation", e))?;
        info!("✅ Created task {} from annotation {}", created.id, annotation.id);
        Ok(created)
    }

    async fn update_task_row(&self, task_id: &str, args: UpdateTaskArgs) -> Result<ProjectTask, SyncError> {
        self.backend.update_task(task_id, args).await.map_err(|e| match e {
            BackendError::NotFound(_) => {
                error!("❌ Task {} not found", task_id);
                SyncError::task_not_found(task_id)
            }
            other => backend_failure("Failed to update task", other),
        })
    }
}
