use serde::Serialize;

/// Uniform envelope returned by every action: a success flag plus a payload or an error message.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        ActionResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ActionResponse<()> {
    pub fn done() -> Self {
        ActionResponse {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ActionResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
