use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Marker placed in request extensions once the session gate let a request through.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;
