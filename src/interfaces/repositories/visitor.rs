use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    db::postgres::{Access, DbPools},
    entities::visitor::VisitRecord,
    errors::AppError,
    repositories::sqlx_repo::SqlxVisitorRepo,
};

#[async_trait]
pub trait VisitorRepository: Send + Sync {
    async fn record_visit(&self, access: Access) -> Result<VisitRecord, AppError>;
    async fn count_visits(&self, access: Access) -> Result<i64, AppError>;
}

#[async_trait]
impl<T> VisitorRepository for Arc<T>
where
    T: VisitorRepository + ?Sized,
{
    async fn record_visit(&self, access: Access) -> Result<VisitRecord, AppError> {
        (**self).record_visit(access).await
    }

    async fn count_visits(&self, access: Access) -> Result<i64, AppError> {
        (**self).count_visits(access).await
    }
}

impl SqlxVisitorRepo {
    pub fn new(pools: DbPools) -> Self {
        SqlxVisitorRepo { pools }
    }
}

#[async_trait]
impl VisitorRepository for SqlxVisitorRepo {
    async fn record_visit(&self, access: Access) -> Result<VisitRecord, AppError> {
        let visit = sqlx::query_as::<_, VisitRecord>(
            "INSERT INTO visitors DEFAULT VALUES RETURNING id, created_at"
        )
        .fetch_one(self.pools.for_access(access))
        .await?;

        Ok(visit)
    }

    async fn count_visits(&self, access: Access) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visitors")
            .fetch_one(self.pools.for_access(access))
            .await?;

        Ok(count)
    }
}
