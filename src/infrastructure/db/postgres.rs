use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use std::time::Duration;

/// Which store credential an operation runs under.
///
/// `Public` connects as the restricted role and is subject to row-level security.
/// `Privileged` connects as the elevated role that bypasses it; moderation writes
/// and visitor tracking need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Privileged,
}

/// The two store clients, built once at start-up and handed to every repository.
#[derive(Clone)]
pub struct DbPools {
    public: PgPool,
    privileged: PgPool,
}

impl DbPools {
    pub fn new(public: PgPool, privileged: PgPool) -> Self {
        DbPools { public, privileged }
    }

    pub async fn connect(database_url: &str, privileged_database_url: &str) -> Result<Self, sqlx::Error> {
        let public = create_pool(database_url).await?;
        let privileged = create_pool(privileged_database_url).await?;
        Ok(DbPools::new(public, privileged))
    }

    pub fn for_access(&self, access: Access) -> &PgPool {
        match access {
            Access::Public => &self.public,
            Access::Privileged => &self.privileged,
        }
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations")
            .run(&self.privileged)
            .await?;
        info!("Database migrations applied.");
        Ok(())
    }

    pub async fn close(&self) {
        self.public.close().await;
        self.privileged.close().await;
    }
}

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let max_retries = 5;
    let mut retry_count = 0;
    let mut wait_seconds = 2;

    loop {
        match PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                info!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                    retry_count, max_retries, e, wait_seconds);

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                wait_seconds *= 2; // Exponential backoff
            }
            Err(e) => return Err(e),
        }
    }
}
