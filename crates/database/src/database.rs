use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::config::DatabaseConfig;
use crate::query::{JsonRow, QueryExecutor, SqlValue, bind_params, row_to_json};

/// Bounded pool of PostgreSQL connections shared by every request.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Creates the connection pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options()?)
            .await?;

        Ok(Self { pool })
    }

    /// Tests the database connection by executing a simple query.
    pub async fn test_connection(&self) -> Result<(), sqlx::Error> {
        let row = sqlx::query("SELECT 1 as test").fetch_one(&self.pool).await?;

        let test_value: i32 = row.get("test");
        log::info!("✅ Database connection successful! Test value: {}", test_value);

        Ok(())
    }

    /// Closes every connection, waiting for checked-out ones to be released first.
    pub async fn close(&self) {
        log::info!("🗃️ Closing database pool ({} connections open)", self.pool.size());
        self.pool.close().await;
    }
}

#[async_trait]
impl QueryExecutor for Database {
    async fn execute(
        &self,
        statement: &str,
        params: &[SqlValue],
    ) -> Result<Vec<JsonRow>, sqlx::Error> {
        log::debug!("executing {} with {} parameter(s)", statement.trim(), params.len());

        let rows = bind_params(sqlx::query(statement), params)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_json).collect()
    }
}
