// Database - SQLx SQLite pool, schema bootstrap and transaction entry point

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::content::{Announcement, Event, Lawyer, Publication};
use crate::error::{AppError, AppResult};
use crate::infrastructure::content_store::ContentStore;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| AppError::Validation(format!("Invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(8))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!("Failed to connect to {}: {}", config.url, e))
            })?;

        info!("Connected to database at {}", config.url);
        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` gets its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn connect_in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Internal(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!("Failed to open in-memory SQLite: {}", e))
            })?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table if missing. Safe to run on each start.
    pub async fn init(&self) -> AppResult<()> {
        let mut conn = self.pool.acquire().await?;

        ContentStore::<Lawyer>::create_tables(&mut conn).await?;
        ContentStore::<Announcement>::create_tables(&mut conn).await?;
        ContentStore::<Event>::create_tables(&mut conn).await?;
        ContentStore::<Publication>::create_tables(&mut conn).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id BLOB PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT,
                subject TEXT NOT NULL DEFAULT '',
                message TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS newsletter_subscribers (
                email TEXT PRIMARY KEY,
                language TEXT NOT NULL,
                subscribed_at TEXT NOT NULL,
                first_subscribed_at TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;

        debug!("Database schema initialized");
        Ok(())
    }

    /// Begin a transaction - dropping it without commit rolls back
    pub async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(|e| {
            AppError::StorageUnavailable(format!("Failed to begin transaction: {}", e))
        })
    }

    pub async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
        tx.commit().await.map_err(|e| {
            AppError::StorageUnavailable(format!("Failed to commit transaction: {}", e))
        })
    }

    /// Health check to verify database connectivity
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// (idle, total) connections
    pub fn pool_stats(&self) -> (u32, u32) {
        (self.pool.num_idle() as u32, self.pool.size())
    }
}
