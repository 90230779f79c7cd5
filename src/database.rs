use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::store::StoreError;

/// Schema for the `events` table, embedded at build time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./src/migrations");

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool behind `PgEventStore`.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Opens a pool sized from `DB_POOL_SIZE`. Fails fast when the server is
    /// unreachable instead of waiting for the first query.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&config.url)
            .await?;

        info!("Connected to Postgres (pool size {})", config.pool_size.max(1));
        Ok(Self::from_pool(pool))
    }

    /// Wraps a pool opened elsewhere, e.g. by a test harness.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies pending migrations. Already-applied ones are skipped.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await?;
        info!("Events schema is up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
