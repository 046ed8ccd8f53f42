//! Unit tests for database connection pool

use crate::config::DatabaseConfig;
use crate::database::connection::{DatabasePool, PoolStatistics};

#[tokio::test]
async fn test_pool_creation_with_invalid_url() {
    let config = DatabaseConfig::new("invalid://url");

    let result = DatabasePool::new(config).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_in_memory_pool_health_check() {
    let pool = DatabasePool::new(DatabaseConfig::in_memory()).await.unwrap();

    let health = pool.health_check().await.unwrap();
    assert!(health);
}

#[tokio::test]
async fn test_in_memory_pool_is_pinned_to_one_connection() {
    let config = DatabaseConfig::in_memory().with_max_connections(8);
    let pool = DatabasePool::new(config).await.unwrap();

    assert_eq!(pool.get_statistics().max_connections, 1);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let pool = DatabasePool::new(DatabaseConfig::in_memory()).await.unwrap();

    tokio_test::assert_ok!(pool.run_migrations().await);
    tokio_test::assert_ok!(pool.run_migrations().await);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'otps'")
            .fetch_one(pool.get_pool())
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_close_marks_pool_closed() {
    let pool = DatabasePool::new(DatabaseConfig::in_memory()).await.unwrap();

    pool.close().await;

    assert!(pool.is_closed());
    assert!(pool.health_check().await.is_err());
}

#[test]
fn test_pool_statistics_display() {
    let stats = PoolStatistics {
        connections: 5,
        idle_connections: 3,
        max_connections: 10,
    };

    let display = format!("{}", stats);
    assert!(display.contains("5/10"));
    assert!(display.contains("3 idle"));
}
