// SQLite TransientStore Implementation
//
// Every write runs in one transaction that first bumps the store-wide
// revision. That UPDATE takes SQLite's write lock up front, so the read and
// rewrite that follow can never interleave with another writer.

use crate::error::{from_sql_int, map_sqlx_error};
use async_trait::async_trait;
use claimq_core::error::Result;
use claimq_core::port::{Rewrite, TimeProvider, Transient, TransientStore};
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;
use tracing::debug;

pub struct SqliteTransientStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteTransientStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

async fn next_revision(conn: &mut SqliteConnection) -> Result<i64> {
    sqlx::query_scalar(
        "UPDATE transient_revision SET revision = revision + 1 WHERE id = 1 RETURNING revision",
    )
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)
}

async fn write_row(
    conn: &mut SqliteConnection,
    key: &str,
    value: &str,
    revision: i64,
    expires_at: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO transients (key, value, version, expires_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(key) DO UPDATE
        SET value = excluded.value,
            version = excluded.version,
            expires_at = excluded.expires_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(revision)
    .bind(expires_at)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

#[async_trait]
impl TransientStore for SqliteTransientStore {
    async fn get(&self, key: &str) -> Result<Option<Transient>> {
        let now = self.time_provider.now_millis();

        let row: Option<(String, i64, i64)> = sqlx::query_as(
            "SELECT value, version, expires_at FROM transients WHERE key = ? AND expires_at > ?",
        )
        .bind(key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|(value, version, expires_at)| {
            Ok(Transient {
                value,
                version: from_sql_int(version, "transient version")?,
                expires_at,
            })
        })
        .transpose()
    }

    async fn set(&self, key: &str, value: &str, ttl_ms: i64) -> Result<()> {
        let expires_at = self.time_provider.now_millis().saturating_add(ttl_ms);

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let revision = next_revision(&mut tx).await?;

        write_row(&mut tx, key, value, revision, expires_at).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn update(&self, key: &str, ttl_ms: i64, rewrite: &mut Rewrite<'_>) -> Result<bool> {
        let now = self.time_provider.now_millis();

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        // Lock first, then read: the value seen below is the one we replace
        let revision = next_revision(&mut tx).await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT value FROM transients WHERE key = ? AND expires_at > ?")
                .bind(key)
                .bind(now)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        let Some(value) = rewrite(current.as_deref())? else {
            debug!(key = %key, "Update left the record untouched");
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(false);
        };

        write_row(&mut tx, key, &value, revision, now.saturating_add(ttl_ms)).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = self.time_provider.now_millis();

        let expires_at: Option<i64> =
            sqlx::query_scalar("DELETE FROM transients WHERE key = ? RETURNING expires_at")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(expires_at.is_some_and(|at| at > now))
    }

    async fn purge_expired(&self) -> Result<u64> {
        let now = self.time_provider.now_millis();

        let result = sqlx::query("DELETE FROM transients WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use claimq_core::application::QueueStore;
    use claimq_core::domain::{ProductId, UserId, DEFAULT_QUEUE_TTL_MS};
    use claimq_core::error::AppError;
    use claimq_core::port::ManualTimeProvider;

    async fn setup_store() -> (Arc<ManualTimeProvider>, Arc<SqliteTransientStore>) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let clock = Arc::new(ManualTimeProvider::new(1_000));
        let store = Arc::new(SqliteTransientStore::new(pool, clock.clone()));
        (clock, store)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (_clock, store) = setup_store().await;
        store.set("k", "v", 500).await.unwrap();

        let t = store.get("k").await.unwrap().unwrap();
        assert_eq!(t.value, "v");
        assert_eq!(t.expires_at, 1_500);
        assert!(t.version > 0);
    }

    #[tokio::test]
    async fn test_get_hides_expired() {
        let (clock, store) = setup_store().await;
        store.set("k", "v", 500).await.unwrap();
        clock.advance(500);
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_reads_and_rewrites() {
        let (_clock, store) = setup_store().await;

        assert!(store
            .update("k", 500, &mut |current| {
                assert_eq!(current, None);
                Ok(Some("a".to_string()))
            })
            .await
            .unwrap());
        let first = store.get("k").await.unwrap().unwrap();

        assert!(store
            .update("k", 500, &mut |current| Ok(current.map(|v| format!("{}b", v))))
            .await
            .unwrap());
        let second = store.get("k").await.unwrap().unwrap();
        assert_eq!(second.value, "ab");
        assert_eq!(second.expires_at, 1_500);
        assert!(second.version > first.version);
    }

    #[tokio::test]
    async fn test_declined_update_writes_nothing() {
        let (_clock, store) = setup_store().await;
        store.set("k", "v", 500).await.unwrap();
        let before = store.get("k").await.unwrap().unwrap();

        assert!(!store.update("k", 900, &mut |_| Ok(None)).await.unwrap());
        assert!(store
            .update("k", 900, &mut |_| Err(AppError::Internal("boom".to_string())))
            .await
            .is_err());

        assert_eq!(store.get("k").await.unwrap().unwrap(), before);

        // Declined updates do not consume a revision either
        store.set("other", "x", 500).await.unwrap();
        let next = store.get("other").await.unwrap().unwrap().version;
        assert_eq!(next, before.version + 1);
    }

    #[tokio::test]
    async fn test_update_takes_over_expired_row() {
        let (clock, store) = setup_store().await;
        store.set("k", "old", 10).await.unwrap();
        let old = store.get("k").await.unwrap().unwrap().version;
        clock.advance(10);

        assert!(store
            .update("k", 10, &mut |current| {
                assert_eq!(current, None);
                Ok(Some("new".to_string()))
            })
            .await
            .unwrap());

        let fresh = store.get("k").await.unwrap().unwrap();
        assert_eq!(fresh.value, "new");
        assert!(fresh.version > old);
    }

    #[tokio::test]
    async fn test_versions_survive_delete() {
        let (_clock, store) = setup_store().await;
        store.set("k", "a", 100).await.unwrap();
        let first = store.get("k").await.unwrap().unwrap().version;

        assert!(store.delete("k").await.unwrap());
        store.set("k", "b", 100).await.unwrap();
        let second = store.get("k").await.unwrap().unwrap().version;

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_delete_and_purge() {
        let (clock, store) = setup_store().await;
        store.set("live", "1", 1_000).await.unwrap();
        store.set("stale", "2", 10).await.unwrap();
        store.set("stale2", "3", 10).await.unwrap();
        clock.advance(10);

        assert!(!store.delete("stale").await.unwrap());
        assert!(!store.delete("missing").await.unwrap());
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.delete("live").await.unwrap());
    }

    #[tokio::test]
    async fn test_queue_store_over_sqlite() {
        let (clock, store) = setup_store().await;
        let queue = QueueStore::new(store.clone(), DEFAULT_QUEUE_TTL_MS);
        let user = UserId::new(1);

        queue.enqueue(user, ProductId::new(501)).await.unwrap();
        queue.enqueue(user, ProductId::new(502)).await.unwrap();

        let raw = store.get("queue:1").await.unwrap().unwrap();
        assert_eq!(raw.value, "[501,502]");

        assert_eq!(queue.dequeue_head(user).await.unwrap(), Some(ProductId::new(501)));

        clock.advance(DEFAULT_QUEUE_TTL_MS);
        assert_eq!(queue.dequeue_head(user).await.unwrap(), None);
    }
}
