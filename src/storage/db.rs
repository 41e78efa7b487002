use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Schema};

use crate::entities::{photo, project, task};

/// Name of the unique `(project_id, photo_id, annotation_task_id)` index that
/// backs idempotent annotation-task upserts.
pub const TASK_ANNOTATION_INDEX: &str = "idx_tasks_project_photo_annotation";

/// Earlier two-column index that ignored the project; dropped on open.
const LEGACY_TASK_ANNOTATION_INDEX: &str = "idx_tasks_photo_annotation";

/// In-memory database URL used by tests and throwaway sessions.
pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Local storage manager for project data
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Open (and create if needed) the database at `database_url`, then
    /// make sure the schema exists.
    pub async fn new(database_url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options.sqlx_logging(false);

        // Every pooled connection to an in-memory database sees its own empty
        // database, so pin the pool to a single long-lived connection.
        if database_url.contains(":memory:") || database_url.contains("mode=memory") {
            options
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(Duration::from_secs(u32::MAX as u64))
                .max_lifetime(Duration::from_secs(u32::MAX as u64));
        }

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to open database: {database_url}"))?;

        let storage = Self { conn };
        storage.init_schema().await?;
        info!("💾 Opened local storage at {database_url}");

        Ok(storage)
    }

    /// Open a fresh in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::new(MEMORY_DATABASE_URL).await
    }

    /// Initialize database schema from the entity definitions.
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        // Parents before children so foreign keys resolve
        let mut projects = schema.create_table_from_entity(project::Entity);
        let mut photos = schema.create_table_from_entity(photo::Entity);
        let mut tasks = schema.create_table_from_entity(task::Entity);

        for stmt in [
            projects.if_not_exists(),
            photos.if_not_exists(),
            tasks.if_not_exists(),
        ] {
            self.conn.execute(backend.build(&*stmt)).await?;
        }

        let legacy = Index::drop()
            .name(LEGACY_TASK_ANNOTATION_INDEX)
            .table(task::Entity)
            .if_exists()
            .to_owned();
        self.conn.execute(backend.build(&legacy)).await?;

        // NULL back-references are distinct in SQLite, so plain tasks are unaffected
        let index = Index::create()
            .name(TASK_ANNOTATION_INDEX)
            .table(task::Entity)
            .col(task::Column::ProjectId)
            .col(task::Column::PhotoId)
            .col(task::Column::AnnotationTaskId)
            .unique()
            .if_not_exists()
            .to_owned();
        self.conn.execute(backend.build(&index)).await?;

        debug!("Schema ready");
        Ok(())
    }

    /// Check if the database has any data
    pub async fn has_data(&self) -> Result<bool> {
        let count = project::Entity::find().count(&self.conn).await?;
        Ok(count > 0)
    }

    /// Clear all data from the database
    pub async fn clear_all_data(&self) -> Result<()> {
        task::Entity::delete_many().exec(&self.conn).await?;
        photo::Entity::delete_many().exec(&self.conn).await?;
        project::Entity::delete_many().exec(&self.conn).await?;
        Ok(())
    }
}
