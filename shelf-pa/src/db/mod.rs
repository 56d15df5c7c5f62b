//! Database access layer for shelf-pa
//!
//! All connections are read-only; persona rows are owned and written by the
//! main application.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

/// Connect to the application database in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}\nThe main application creates it on first run.",
            db_path.display()
        );
    }

    // mode=ro: SQLite rejects every write on this connection
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to database in read-only mode")?;

    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            anyhow::bail!("Database connection is not read-only: {}", db_path.display());
        }
    }

    Ok(pool)
}
