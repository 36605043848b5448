//! Database operations for the `watchlists` table. Read-only to the pipeline.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `watchlists` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WatchlistRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// JSON array of keyword strings.
    pub keywords: Value,
    pub created_at: DateTime<Utc>,
}

/// List all watchlists, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_watchlists(pool: &PgPool) -> Result<Vec<WatchlistRow>, DbError> {
    let rows = sqlx::query_as::<_, WatchlistRow>(
        "SELECT id, name, description, keywords, created_at \
         FROM watchlists \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
