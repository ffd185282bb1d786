use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One uploaded asset and its wall visibility (`messages` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageRecord {
    pub id: Uuid,
    pub cloudinary_public_id: String,
    pub image_url: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/images`, sent once the media host accepted the file.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordUploadRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Asset identifier is required"))]
    pub cloudinary_public_id: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Image URL is required"))]
    pub image_url: String,
}

/// Insert values, taken from a request already trimmed and validated by the gallery handler. `is_public` and `created_at` are left to the store.
#[derive(Debug, Clone)]
pub struct NewImageRecord {
    pub cloudinary_public_id: String,
    pub image_url: String,
}

impl From<RecordUploadRequest> for NewImageRecord {
    fn from(request: RecordUploadRequest) -> Self {
        NewImageRecord {
            cloudinary_public_id: request.cloudinary_public_id,
            image_url: request.image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct RemoveImageQuery {
    #[serde(default)]
    pub public_id: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub images: Vec<ImageRecord>,
    pub total_images: usize,
    pub visitor_count: i64,
}
