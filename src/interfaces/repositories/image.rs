use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::postgres::{Access, DbPools},
    entities::image::{ImageRecord, NewImageRecord},
    errors::AppError,
    repositories::sqlx_repo::SqlxImageRepo,
};

const IMAGE_COLUMNS: &str = "id, cloudinary_public_id, image_url, is_public, created_at";

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn check_connection(&self, access: Access) -> Result<(), AppError>;
    async fn insert_image(&self, access: Access, image: &NewImageRecord) -> Result<ImageRecord, AppError>;
    async fn list_images(&self, access: Access) -> Result<Vec<ImageRecord>, AppError>;
    async fn list_public_images(&self, access: Access) -> Result<Vec<ImageRecord>, AppError>;
    async fn set_visibility(&self, access: Access, id: &Uuid, is_public: bool) -> Result<ImageRecord, AppError>;
    async fn delete_image(&self, access: Access, id: &Uuid) -> Result<(), AppError>;
}

#[async_trait]
impl<T> ImageRepository for Arc<T>
where
    T: ImageRepository + ?Sized,
{
    async fn check_connection(&self, access: Access) -> Result<(), AppError> {
        (**self).check_connection(access).await
    }

    async fn insert_image(&self, access: Access, image: &NewImageRecord) -> Result<ImageRecord, AppError> {
        (**self).insert_image(access, image).await
    }

    async fn list_images(&self, access: Access) -> Result<Vec<ImageRecord>, AppError> {
        (**self).list_images(access).await
    }

    async fn list_public_images(&self, access: Access) -> Result<Vec<ImageRecord>, AppError> {
        (**self).list_public_images(access).await
    }

    async fn set_visibility(&self, access: Access, id: &Uuid, is_public: bool) -> Result<ImageRecord, AppError> {
        (**self).set_visibility(access, id, is_public).await
    }

    async fn delete_image(&self, access: Access, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_image(access, id).await
    }
}

impl SqlxImageRepo {
    pub fn new(pools: DbPools) -> Self {
        SqlxImageRepo { pools }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn check_connection(&self, access: Access) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pools.for_access(access))
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn insert_image(&self, access: Access, image: &NewImageRecord) -> Result<ImageRecord, AppError> {
        let record = sqlx::query_as::<_, ImageRecord>(&format!(
            "INSERT INTO messages (cloudinary_public_id, image_url) VALUES ($1, $2) RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(&image.cloudinary_public_id)
        .bind(&image.image_url)
        .fetch_one(self.pools.for_access(access))
        .await?;

        Ok(record)
    }

    async fn list_images(&self, access: Access) -> Result<Vec<ImageRecord>, AppError> {
        let images = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM messages ORDER BY created_at DESC"
        ))
        .fetch_all(self.pools.for_access(access))
        .await?;

        Ok(images)
    }

    async fn list_public_images(&self, access: Access) -> Result<Vec<ImageRecord>, AppError> {
        let images = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM messages WHERE is_public = TRUE ORDER BY created_at DESC"
        ))
        .fetch_all(self.pools.for_access(access))
        .await?;

        Ok(images)
    }

    async fn set_visibility(&self, access: Access, id: &Uuid, is_public: bool) -> Result<ImageRecord, AppError> {
        sqlx::query_as::<_, ImageRecord>(&format!(
            "UPDATE messages SET is_public = $1 WHERE id = $2 RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(is_public)
        .bind(id)
        .fetch_optional(self.pools.for_access(access))
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
    }

    async fn delete_image(&self, access: Access, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(self.pools.for_access(access))
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Image not found".into()));
        }

        Ok(())
    }
}
