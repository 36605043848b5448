//! Database operations for the `monitored_figures` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `monitored_figures` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FigureRow {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    pub platform: String,
    pub platform_id: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List every monitored figure, oldest first.
///
/// The poller reads this at the top of each cycle.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_figures(pool: &PgPool) -> Result<Vec<FigureRow>, DbError> {
    let rows = sqlx::query_as::<_, FigureRow>(
        "SELECT id, name, title, platform, platform_id, category, created_at \
         FROM monitored_figures \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
