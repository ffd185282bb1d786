use uuid::Uuid;

use crate::errors::AppError;

/// Parses an id taken from a request path. Surrounding whitespace is ignored.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::field("id", "Invalid UUID format"))
}
