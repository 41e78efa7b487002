//! Project repository for database operations.

use anyhow::Result;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder};

use crate::entities::project;

/// Repository for project-related database operations.
pub struct ProjectRepository;

impl ProjectRepository {
    /// Get a single project by id.
    pub async fn get_by_id<C>(conn: &C, id: &str) -> Result<Option<project::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(project::Entity::find_by_id(id.to_string()).one(conn).await?)
    }

    /// Get all projects ordered by name.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<project::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(project::Entity::find()
            .order_by_asc(project::Column::Name)
            .all(conn)
            .await?)
    }

    /// Insert a new project.
    pub async fn create<C>(conn: &C, project: project::ActiveModel) -> Result<project::Model>
    where
        C: ConnectionTrait,
    {
        Ok(project.insert(conn).await?)
    }
}
