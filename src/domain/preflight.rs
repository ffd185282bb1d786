use derive_more::Display;

use crate::constants::{ACCEPTED_IMAGE_TYPES, MAX_UPLOAD_BYTES};
use crate::entities::upload::SelectedFile;

/// Reasons a file is refused before any credentials are requested.
/// These checks are advisory; the server never inspects file content.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum PreflightError {
    #[display("Only image files (JPEG, PNG, WebP, GIF) are allowed")]
    UnsupportedType(String),

    #[display("File size must be 5MB or less")]
    TooLarge(u64),

    #[display("File is empty")]
    Empty,
}

impl std::error::Error for PreflightError {}

/// Client-side acceptance policy: accepted image MIME type, non-empty, at most 5 MiB.
pub fn check_file(mime_type: &str, size: u64) -> Result<(), PreflightError> {
    let mime = mime_type.trim().to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(PreflightError::UnsupportedType(mime));
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(PreflightError::TooLarge(size));
    }

    if size == 0 {
        return Err(PreflightError::Empty);
    }

    Ok(())
}

pub fn validate_file(file: &SelectedFile) -> Result<(), PreflightError> {
    check_file(&file.mime_type, file.size())
}
