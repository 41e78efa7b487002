use log::{debug, error, info};

use crate::annotations::{self, AnnotationTask, EditError};
use crate::backend::{BackendError, Photo, UpdatePhotoArgs};
use crate::sync::{require_id, SyncError, SyncService};

impl SyncService {
    /// Replaces the annotation tasks stored on a photo.
    ///
    /// The whole array is overwritten; the annotation editor always saves the
    /// complete list.
    ///
    /// # Errors
    /// - [`SyncError::Validation`] if `photo_id` is blank
    /// - [`SyncError::NotFound`] if the photo does not exist
    /// - [`SyncError::Backend`] if serialization or the photo update fails
    pub async fn save_annotation_tasks(&self, photo_id: &str, tasks: &[AnnotationTask]) -> Result<Photo, SyncError> {
        require_id(photo_id, "photo_id")?;

        let json = annotations::serialize_annotation_tasks(tasks)
            .map_err(|e| SyncError::Backend(BackendError::InvalidData(e.to_string())))?;
        let args = UpdatePhotoArgs {
            tasks: Some(json),
            ..Default::default()
        };

        let photo = self.backend.update_photo(photo_id, args).await.map_err(|e| match e {
            BackendError::NotFound(_) => SyncError::photo_not_found(photo_id),
            other => {
                error!("❌ Failed to save annotation tasks on photo {}: {other}", photo_id);
                SyncError::Backend(other)
            }
        })?;
        info!("💾 Saved {} annotation task(s) on photo {}", tasks.len(), photo_id);
        Ok(photo)
    }

    pub(crate) async fn load_photo(&self, photo_id: &str) -> Result<Photo, SyncError> {
        match self.backend.fetch_photo(photo_id).await {
            Ok(Some(photo)) => Ok(photo),
            Ok(None) => {
                error!("❌ Photo {} not found", photo_id);
                Err(SyncError::photo_not_found(photo_id))
            }
            Err(e) => {
                error!("❌ Failed to load photo {}: {e}", photo_id);
                Err(SyncError::from(e))
            }
        }
    }

    /// Applies `change` to one embedded annotation task and writes the array back.
    ///
    /// Only the matching entry is rewritten; sibling entries and unmodelled keys
    /// are stored as they were read, and a malformed column is left untouched.
    /// Returns `false` when the entry already matched and no write was needed.
    pub(crate) async fn mirror_to_photo<F>(&self, photo_id: &str, annotation_id: &str, change: F) -> Result<bool, SyncError>
    where
        F: FnOnce(&mut AnnotationTask),
    {
        let photo = self.load_photo(photo_id).await?;

        let json = match annotations::edit_annotation_task(photo.tasks.as_deref(), annotation_id, change) {
            Ok(Some(json)) => json,
            Ok(None) => {
                debug!("Annotation {} on photo {} already up to date", annotation_id, photo_id);
                return Ok(false);
            }
            Err(EditError::Missing(_)) => {
                return Err(SyncError::NotFound {
                    kind: "annotation task",
                    id: format!("{annotation_id} on photo {photo_id}"),
                })
            }
            Err(e) => {
                return Err(SyncError::Backend(BackendError::InvalidData(format!(
                    "photo {photo_id} tasks: {e}"
                ))))
            }
        };

        let args = UpdatePhotoArgs {
            tasks: Some(json),
            ..Default::default()
        };
        self.backend.update_photo(photo_id, args).await?;

        info!("✅ Mirrored task change into annotation {} on photo {}", annotation_id, photo_id);
        Ok(true)
    }
}
