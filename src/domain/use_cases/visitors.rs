use crate::{db::postgres::Access, repositories::visitor::VisitorRepository};

/// Visit counting. Neither operation ever fails towards the caller.
pub struct VisitorHandler<R>
where
    R: VisitorRepository,
{
    pub visitor_repo: R,
}

impl<R> VisitorHandler<R>
where
    R: VisitorRepository,
{
    pub fn new(visitor_repo: R) -> Self {
        VisitorHandler { visitor_repo }
    }

    /// Appends one visit. Failures are logged and swallowed so page renders never depend on them.
    pub async fn record_visit(&self) {
        match self.visitor_repo.record_visit(Access::Privileged).await {
            Ok(visit) => tracing::debug!(id = %visit.id, "Visit recorded"),
            Err(e) => tracing::error!(error = %e, "Error tracking visitor"),
        }
    }

    /// Total visits, or 0 when the store cannot answer.
    pub async fn count_visits(&self) -> i64 {
        self.visitor_repo
            .count_visits(Access::Privileged)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Error getting visitor count");
                0
            })
    }
}
