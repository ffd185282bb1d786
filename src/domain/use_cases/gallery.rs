use validator::Validate;

use crate::{
    db::postgres::Access,
    entities::{
        image::{ImageRecord, NewImageRecord, RecordUploadRequest},
        upload::{DeletionOutcome, UploadCredentials},
    },
    errors::{AppError, FieldError},
    repositories::{image::ImageRepository, media_host::MediaHost},
    utils::valid_uuid::valid_uuid,
};

/// Upload recording and moderation of image records.
pub struct GalleryHandler<R, M>
where
    R: ImageRepository,
    M: MediaHost,
{
    pub image_repo: R,
    pub media_host: M,
}

impl<R, M> GalleryHandler<R, M>
where
    R: ImageRepository,
    M: MediaHost,
{
    pub fn new(image_repo: R, media_host: M) -> Self {
        GalleryHandler { image_repo, media_host }
    }

    /// Fresh signed parameters for a direct upload to the media host.
    pub fn request_upload_credentials(&self) -> Result<UploadCredentials, AppError> {
        self.media_host
            .upload_credentials()
            .map_err(|e| logged("Error generating upload signature", AppError::from(e)))
    }

    /// Saves the record of an asset the media host already stores. New records are never public.
    pub async fn record_upload(&self, request: RecordUploadRequest) -> Result<ImageRecord, AppError> {
        let request = RecordUploadRequest {
            cloudinary_public_id: request.cloudinary_public_id.trim().to_string(),
            image_url: request.image_url.trim().to_string(),
        };
        request.validate()?;

        let new_image = NewImageRecord::from(request);
        let record = self.image_repo
            .insert_image(Access::Public, &new_image)
            .await
            .map_err(|e| logged("Failed to save image metadata", e))?;

        tracing::info!(id = %record.id, public_id = %record.cloudinary_public_id, "Image metadata saved");
        Ok(record)
    }

    /// Every record, newest first.
    pub async fn list_all(&self) -> Result<Vec<ImageRecord>, AppError> {
        self.image_repo
            .list_images(Access::Public)
            .await
            .map_err(|e| logged("Failed to fetch images", e))
    }

    /// The public wall, newest first.
    pub async fn list_public(&self) -> Result<Vec<ImageRecord>, AppError> {
        self.image_repo
            .list_public_images(Access::Public)
            .await
            .map_err(|e| logged("Failed to fetch public images", e))
    }

    pub async fn set_visibility(&self, id: &str, is_public: bool) -> Result<ImageRecord, AppError> {
        let image_id = valid_uuid(id)?;

        let record = self.image_repo
            .set_visibility(Access::Privileged, &image_id, is_public)
            .await
            .map_err(|e| logged("Failed to update status", e))?;

        tracing::info!(id = %record.id, is_public, "Image visibility changed");
        Ok(record)
    }

    /// Deletes the asset at the media host, then the record.
    ///
    /// The two steps are not atomic. If the record delete fails after the asset is
    /// gone the record is left behind and the error is reported; nothing is rolled back.
    pub async fn remove(&self, id: &str, public_id: &str) -> Result<(), AppError> {
        let public_id = public_id.trim();
        if id.trim().is_empty() || public_id.is_empty() {
            let mut fields = Vec::new();
            if id.trim().is_empty() {
                fields.push(("id", "Image id is required"));
            }
            if public_id.is_empty() {
                fields.push(("public_id", "Asset identifier is required"));
            }
            return Err(AppError::ValidationError(
                fields
                    .into_iter()
                    .map(|(field, message)| FieldError {
                        field: field.to_string(),
                        message: message.to_string(),
                    })
                    .collect(),
            ));
        }
        let image_id = valid_uuid(id)?;

        match self.media_host.delete_asset(public_id).await {
            Ok(DeletionOutcome::Deleted) => tracing::debug!(public_id, "Asset deleted at media host"),
            Ok(DeletionOutcome::NotFound) => tracing::debug!(public_id, "Asset was already gone"),
            Err(e) => return Err(logged("Error deleting from media host", AppError::from(e))),
        }

        self.image_repo
            .delete_image(Access::Privileged, &image_id)
            .await
            .map_err(|e| {
                if matches!(e, AppError::Persistence(_)) {
                    tracing::warn!(id = %image_id, public_id, "Asset removed but its record remains");
                }
                logged("Failed to delete image from database", e)
            })?;

        tracing::info!(id = %image_id, public_id, "Image removed");
        Ok(())
    }
}

/// Logs store and media host failures in full; caller mistakes only at debug.
fn logged(context: &str, err: AppError) -> AppError {
    match &err {
        AppError::ValidationError(_) | AppError::NotFound(_) => tracing::debug!(error = %err, "{}", context),
        _ => tracing::error!(error = %err, "{}", context),
    }
    err
}
