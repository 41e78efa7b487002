//! Photo repository for database operations.

use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};

use crate::entities::photo;

/// Repository for photo-related database operations.
pub struct PhotoRepository;

impl PhotoRepository {
    /// Get a single photo by id.
    pub async fn get_by_id<C>(conn: &C, id: &str) -> Result<Option<photo::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(photo::Entity::find_by_id(id.to_string()).one(conn).await?)
    }

    /// Get all photos of a project, oldest first.
    pub async fn get_for_project<C>(conn: &C, project_id: &str) -> Result<Vec<photo::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(photo::Entity::find()
            .filter(photo::Column::ProjectId.eq(project_id))
            .order_by_asc(photo::Column::CreatedAt)
            .order_by_asc(photo::Column::Id)
            .all(conn)
            .await?)
    }

    /// Insert a new photo.
    pub async fn create<C>(conn: &C, photo: photo::ActiveModel) -> Result<photo::Model>
    where
        C: ConnectionTrait,
    {
        Ok(photo.insert(conn).await?)
    }

    /// Update a photo in the database.
    pub async fn update<C>(conn: &C, photo: photo::ActiveModel) -> Result<photo::Model>
    where
        C: ConnectionTrait,
    {
        Ok(photo.update(conn).await?)
    }

    /// Delete a photo from the database.
    pub async fn delete<C>(conn: &C, photo: photo::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        photo.delete(conn).await?;
        Ok(())
    }
}
