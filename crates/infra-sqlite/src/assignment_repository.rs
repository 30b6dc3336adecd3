// SQLite AssignmentRepository Implementation

use crate::error::{from_sql_int, map_sqlx_error, to_sql_int};
use async_trait::async_trait;
use claimq_core::domain::{Assignment, AssignmentKey, ConsumerId, ContainerId, ProductId};
use claimq_core::error::Result;
use claimq_core::port::AssignmentRepository;
use sqlx::SqlitePool;

pub struct SqliteAssignmentRepository {
    pool: SqlitePool,
}

impl SqliteAssignmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for SqliteAssignmentRepository {
    async fn find(&self, key: &AssignmentKey) -> Result<Option<Assignment>> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT container_id, consumer_id, product_id, assigned_at
            FROM assignments
            WHERE storage_key = ?
            "#,
        )
        .bind(key.storage_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(AssignmentRow::into_assignment).transpose()
    }

    async fn insert_if_absent(&self, assignment: &Assignment) -> Result<bool> {
        // Write-once: an existing row for the pair is never overwritten
        let result = sqlx::query(
            r#"
            INSERT INTO assignments (storage_key, container_id, consumer_id, product_id, assigned_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(storage_key) DO NOTHING
            "#,
        )
        .bind(assignment.key.storage_key())
        .bind(assignment.key.container.as_str())
        .bind(assignment.key.consumer.as_str())
        .bind(to_sql_int(assignment.product_id.get(), "product id")?)
        .bind(assignment.assigned_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    container_id: String,
    consumer_id: String,
    product_id: i64,
    assigned_at: i64,
}

impl AssignmentRow {
    fn into_assignment(self) -> Result<Assignment> {
        let key = AssignmentKey::new(
            ContainerId::parse(self.container_id)?,
            ConsumerId::parse(self.consumer_id)?,
        );
        let product_id = ProductId::new(from_sql_int(self.product_id, "product id")?);
        Ok(Assignment::new(key, product_id, self.assigned_at))
    }
}
