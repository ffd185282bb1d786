use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::upload::{DeletionOutcome, UploadCredentials},
    errors::MediaHostError,
};

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Signs a fresh `{timestamp, folder}` parameter set for a direct upload.
    fn upload_credentials(&self) -> Result<UploadCredentials, MediaHostError>;

    /// Deletes an asset. An asset that is already gone is reported as `NotFound`, not as an error.
    async fn delete_asset(&self, public_id: &str) -> Result<DeletionOutcome, MediaHostError>;
}

#[async_trait]
impl<T> MediaHost for Arc<T>
where
    T: MediaHost + ?Sized,
{
    fn upload_credentials(&self) -> Result<UploadCredentials, MediaHostError> {
        (**self).upload_credentials()
    }

    async fn delete_asset(&self, public_id: &str) -> Result<DeletionOutcome, MediaHostError> {
        (**self).delete_asset(public_id).await
    }
}
