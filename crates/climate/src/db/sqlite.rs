use anyhow::{Context, Result};
use climate_api_core::is_file;
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

use super::schema;

/// Read-only handle on the climate dataset.
///
/// The pool is shared by every request; each query checks a connection out
/// and returns it once the statement finishes.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(path: &str, max_connections: u32) -> Result<Self> {
        if !is_file(path) {
            return Err(anyhow::anyhow!("Climate dataset not found at: {}", path));
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .pragma("busy_timeout", "5000");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        schema::verify(&pool)
            .await
            .with_context(|| format!("Dataset at {} does not match the expected schema", path))?;

        info!(
            "SQLite dataset opened read-only at: {} (schema v{}, {} connections)",
            path,
            schema::SCHEMA_VERSION,
            max_connections.max(1)
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check database connectivity and integrity.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connectivity check failed")?;

        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await
            .context("Database integrity check failed")?;
        if result != "ok" {
            return Err(anyhow::anyhow!(
                "Database integrity check failed: {}",
                result
            ));
        }

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite dataset closed");
    }
}
