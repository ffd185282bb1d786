use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

use crate::constants::LOGIN_PATH;
use crate::domain::preflight::PreflightError;

#[derive(Debug)]
pub enum AppError {
    Configuration(String),
    ValidationError(Vec<FieldError>),
    Persistence(String),
    NotFound(String),
    MediaHost(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::MediaHost(msg) => write!(f, "Media host error: {}", msg),
        }
    }
}

impl AppError {
    /// Message safe to hand to the caller. Store and media host details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Configuration(_) => "Service is not configured".to_string(),
            AppError::ValidationError(_) => "Missing required parameters".to_string(),
            AppError::Persistence(_) => "A storage error occurred".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::MediaHost(_) => "Failed to delete image".to_string(),
        }
    }

    pub fn field(field: &str, message: &str) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "success": false,
                    "error": self.public_message(),
                    "details": errors
                })
            }
            _ => {
                serde_json::json!({"success": false, "error": self.public_message()})
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MediaHost(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Persistence(format!("Database error: {}", err))
        }
    }
}

impl From<MediaHostError> for AppError {
    fn from(err: MediaHostError) -> Self {
        match err {
            MediaHostError::NotConfigured => AppError::Configuration(err.to_string()),
            _ => AppError::MediaHost(err.to_string()),
        }
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("كلمة المرور غير صحيحة")]
    WrongCredentials,

    #[display("حدث خطأ أثناء تسجيل الدخول")]
    LoginFailed,

    #[display("Admin session required")]
    Unauthenticated,
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::Unauthenticated => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish(),
            _ => HttpResponse::build(self.status_code())
                .json(serde_json::json!({"success": false, "error": self.to_string()})),
        }
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::LoginFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Unauthenticated => StatusCode::SEE_OTHER,
        }
    }
}

#[derive(Debug, Display)]
pub enum MediaHostError {
    #[display("Missing Cloudinary configuration")]
    NotConfigured,

    #[display("Media host request failed: {_0}")]
    Request(String),

    #[display("Media host refused the request ({_0}): {_1}")]
    Status(u16, String),

    #[display("Failed to delete asset: {_0}")]
    Rejected(String),

    #[display("Unexpected media host response: {_0}")]
    UnexpectedResponse(String),
}

impl std::error::Error for MediaHostError {}

impl From<reqwest::Error> for MediaHostError {
    fn from(err: reqwest::Error) -> Self {
        MediaHostError::Request(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Failures of the client-side upload workflow, one per step.
#[derive(Debug, Display)]
pub enum UploadError {
    #[display("{_0}")]
    Preflight(PreflightError),

    #[display("Failed to prepare: {_0}")]
    Credentials(String),

    #[display("Upload failed: {_0}")]
    Transfer(String),

    #[display("Upload failed with status {_0}")]
    HostRejected(u16),

    #[display("Failed to save: {_0}")]
    Record(String),
}

impl std::error::Error for UploadError {}

impl From<PreflightError> for UploadError {
    fn from(err: PreflightError) -> Self {
        UploadError::Preflight(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_details_stay_out_of_responses() {
        let err = AppError::Persistence("password authentication failed for user \"service\"".into());

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "A storage error occurred");
    }

    #[test]
    fn missing_media_settings_are_a_configuration_error() {
        let err = AppError::from(MediaHostError::NotConfigured);

        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.public_message(), "Service is not configured");
    }

    #[test]
    fn refused_destroy_is_a_bad_gateway() {
        let err = AppError::from(MediaHostError::Rejected("error".into()));

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_row_is_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        let response = AuthError::Unauthenticated.error_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
    }
}
