//! Insert-only database adapter backed by PostgreSQL.
//!
//! Every callback becomes a new row in `moderation_results`; repeated
//! requestIds insert additional rows rather than updating earlier ones,
//! so redeliveries keep their full history. Schema setup is idempotent
//! and runs at startup.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    archive::Archive,
    error::Result,
    models::{ArchiveReceipt, CallbackId, ModerationResult},
};

/// Database-backed archive inserting one row per callback.
#[derive(Debug, Clone)]
pub struct DbArchive {
    pool: PgPool,
}

impl DbArchive {
    /// Creates the adapter over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ensures the `moderation_results` table and its indexes exist.
    ///
    /// # Errors
    ///
    /// Returns an error when a DDL statement fails.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS moderation_results (
                id UUID PRIMARY KEY,
                media TEXT NOT NULL,
                request_id TEXT,
                bt_id TEXT,
                message TEXT,
                risk_level TEXT,
                payload JSONB NOT NULL,
                received_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_moderation_results_request_id
            ON moderation_results(request_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_moderation_results_media_received_at
            ON moderation_results(media, received_at DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Archive for DbArchive {
    async fn store(&self, result: &ModerationResult) -> Result<ArchiveReceipt> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO moderation_results (
                id, media, request_id, bt_id, message, risk_level, payload, received_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(result.media.as_str())
        .bind(&result.request_id)
        .bind(&result.bt_id)
        .bind(&result.message)
        .bind(&result.risk_level)
        .bind(&result.payload)
        .bind(result.received_at)
        .fetch_one(&self.pool)
        .await?;

        let id = CallbackId::from(id);
        debug!(id = %id, media = %result.media, "Inserted moderation result");

        Ok(ArchiveReceipt::Database { id })
    }

    fn requires_validation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::models::MediaKind;

    fn audio_result(request_id: &str) -> ModerationResult {
        let payload = json!({
            "requestId": request_id,
            "btId": "bt-db",
            "message": "approved",
            "riskLevel": "PASS",
        });
        ModerationResult::from_payload(MediaKind::Audio, payload, Utc::now())
    }

    #[tokio::test]
    async fn database_adapter_enforces_validation() {
        let pool = PgPool::connect_lazy("postgres://localhost/modsink").expect("lazy pool");

        assert!(DbArchive::new(pool).requires_validation());
    }

    /// Requires PostgreSQL; point `DATABASE_URL` at a scratch database.
    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn insert_round_trips_against_postgres() {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/modsink".to_string());
        let pool = PgPool::connect(&url).await.expect("connect postgres");
        let archive = DbArchive::new(pool.clone());
        archive.run_migrations().await.expect("run migrations");

        let receipt = archive.store(&audio_result("req-db-1")).await.expect("store result");
        let ArchiveReceipt::Database { id } = receipt else {
            panic!("expected database receipt, got {receipt:?}");
        };

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM moderation_results WHERE id = $1")
                .bind(id.0)
                .fetch_one(&pool)
                .await
                .expect("count rows");
        assert_eq!(count, 1);
    }

    /// Requires PostgreSQL; point `DATABASE_URL` at a scratch database.
    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn repeated_request_ids_insert_new_rows() {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/modsink".to_string());
        let pool = PgPool::connect(&url).await.expect("connect postgres");
        let archive = DbArchive::new(pool.clone());
        archive.run_migrations().await.expect("run migrations");

        let request_id = format!("req-dup-{}", Uuid::new_v4().simple());
        archive.store(&audio_result(&request_id)).await.expect("store first");
        archive.store(&audio_result(&request_id)).await.expect("store second");

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM moderation_results WHERE request_id = $1")
                .bind(&request_id)
                .fetch_one(&pool)
                .await
                .expect("count rows");
        assert_eq!(count, 2);
    }
}
