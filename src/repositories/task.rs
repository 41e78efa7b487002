//! Task repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};

use crate::entities::task;

/// Repository for task-related database operations.
pub struct TaskRepository;

impl TaskRepository {
    /// Get a single task by id.
    pub async fn get_by_id<C>(conn: &C, id: &str) -> Result<Option<task::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::find_by_id(id.to_string()).one(conn).await?)
    }

    /// Get all tasks for a specific project, open tasks first.
    pub async fn get_for_project<C>(conn: &C, project_id: &str) -> Result<Vec<task::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::find()
            .filter(task::Column::ProjectId.eq(project_id))
            .order_by_asc(task::Column::Completed)
            .order_by_asc(task::Column::CreatedAt)
            .order_by_asc(task::Column::Id)
            .all(conn)
            .await?)
    }

    /// Get the task a project created from a given photo annotation.
    pub async fn get_by_annotation<C>(
        conn: &C,
        project_id: &str,
        photo_id: &str,
        annotation_task_id: &str,
    ) -> Result<Option<task::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::find()
            .filter(task::Column::ProjectId.eq(project_id))
            .filter(task::Column::PhotoId.eq(photo_id))
            .filter(task::Column::AnnotationTaskId.eq(annotation_task_id))
            .one(conn)
            .await?)
    }

    /// Insert a new task.
    pub async fn create<C>(conn: &C, task: task::ActiveModel) -> Result<task::Model>
    where
        C: ConnectionTrait,
    {
        Ok(task.insert(conn).await?)
    }

    /// Insert a task, or refresh the row of the same project that already links
    /// the same photo annotation.
    ///
    /// The conflict target is the unique `(project_id, photo_id, annotation_task_id)`
    /// index; identity and creation time of an existing row are kept.
    pub async fn upsert_by_annotation<C>(conn: &C, task: task::ActiveModel) -> Result<()>
    where
        C: ConnectionTrait,
    {
        task::Entity::insert(task)
            .on_conflict(
                OnConflict::columns([
                    task::Column::ProjectId,
                    task::Column::PhotoId,
                    task::Column::AnnotationTaskId,
                ])
                    .update_columns([
                        task::Column::Title,
                        task::Column::Completed,
                        task::Column::Status,
                        task::Column::Priority,
                        task::Column::PhotoUrl,
                        task::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }

    /// Update a task in the database.
    pub async fn update<C>(conn: &C, task: task::ActiveModel) -> Result<task::Model>
    where
        C: ConnectionTrait,
    {
        Ok(task.update(conn).await?)
    }

    /// Delete a task from the database.
    pub async fn delete<C>(conn: &C, task: task::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        task.delete(conn).await?;
        Ok(())
    }
}
