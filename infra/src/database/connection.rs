//! Database connection pool management
//!
//! This module provides SQLite connection pooling using SQLx, along with health
//! checks, pool statistics and the embedded migrations for the OTP schema.

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    ConnectOptions, SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

use crate::config::DatabaseConfig;
use crate::InfrastructureError;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database connection pool wrapper
///
/// Manages the SQLite connection pool with configurable settings for connection
/// limits and timeouts.
#[derive(Clone)]
pub struct DatabasePool {
    /// SQLx SQLite connection pool
    pool: SqlitePool,
    /// Configuration used to create this pool
    config: DatabaseConfig,
}

impl DatabasePool {
    /// Create a new database connection pool
    ///
    /// File databases are created when missing. An in-memory database lives only as
    /// long as its connection, so its pool is pinned to one connection that is never
    /// recycled.
    ///
    /// # Example
    /// ```no_run
    /// use otp_infra::config::DatabaseConfig;
    /// use otp_infra::database::connection::DatabasePool;
    ///
    /// async fn create_pool() -> Result<DatabasePool, Box<dyn std::error::Error>> {
    ///     let pool = DatabasePool::new(DatabaseConfig::new("sqlite://otp.db")).await?;
    ///     pool.run_migrations().await?;
    ///     Ok(pool)
    /// }
    /// ```
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            in_memory = config.is_in_memory(),
            max_connections = config.max_connections,
            "Opening SQLite pool"
        );

        let connect_options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(config.connect_timeout))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(
                LevelFilter::Warn,
                Duration::from_millis(config.slow_query_threshold),
            );

        let pool_options = SqlitePoolOptions::new()
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .test_before_acquire(true);

        let pool_options = if config.is_in_memory() {
            pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            pool_options
                .max_connections(config.max_connections.max(1))
                .idle_timeout(Duration::from_secs(600)) // 10 minutes
                .max_lifetime(Duration::from_secs(1800)) // 30 minutes
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, event = "sqlite_open_failed", "Failed to open SQLite pool");
                InfrastructureError::Database(e)
            })?;

        Ok(Self { pool, config })
    }

    /// Get a reference to the underlying SQLx pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Round-trip a trivial query
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let (value,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(value == 1)
    }

    /// Get connection pool statistics
    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    /// Wait for checked-out connections to return, then close them all
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(stats = %self.get_statistics(), "SQLite pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Apply the embedded migrations that create the OTP schema
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        MIGRATOR.run(&self.pool).await?;
        tracing::info!(migrations = MIGRATOR.iter().count(), "SQLite schema up to date");
        Ok(())
    }
}

/// Connection pool statistics
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    /// Total number of connections in the pool
    pub connections: u32,
    /// Number of idle connections
    pub idle_connections: usize,
    /// Maximum allowed connections
    pub max_connections: u32,
}

impl std::fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} connections, {} idle",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}
