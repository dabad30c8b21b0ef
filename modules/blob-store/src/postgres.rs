// Postgres backend: one row per blob in a shared `blobs` table.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::Result;
use crate::BlobStore;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS blobs (
    bucket     TEXT        NOT NULL,
    name       TEXT        NOT NULL,
    body       BYTEA       NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (bucket, name)
)
"#;

pub struct PgBlobStore {
    pool: PgPool,
    bucket: String,
}

impl PgBlobStore {
    pub fn new(pool: PgPool, bucket: &str) -> Self {
        Self {
            pool,
            bucket: bucket.to_string(),
        }
    }

    /// Open a small pool against `database_url` and ensure the table exists.
    pub async fn connect(database_url: &str, bucket: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self::new(pool, bucket);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!(bucket = self.bucket.as_str(), "blobs table ready");
        Ok(())
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let body = sqlx::query_scalar::<_, Vec<u8>>(
            "SELECT body FROM blobs WHERE bucket = $1 AND name = $2",
        )
        .bind(&self.bucket)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body)
    }

    async fn put(&self, name: &str, body: Vec<u8>) -> Result<()> {
        let bytes = body.len();
        sqlx::query(
            r#"
            INSERT INTO blobs (bucket, name, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (bucket, name)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(&self.bucket)
        .bind(name)
        .bind(body)
        .execute(&self.pool)
        .await?;
        debug!(bucket = self.bucket.as_str(), name, bytes, "blob written");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        sqlx::query("DELETE FROM blobs WHERE bucket = $1 AND name = $2")
            .bind(&self.bucket)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn atomic_put(&self) -> bool {
        true
    }
}
