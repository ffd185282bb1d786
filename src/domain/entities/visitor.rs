use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One home-page render. Rows are only ever appended.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VisitRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}
