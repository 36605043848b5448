//! Database operations for the `alerts` table. Append-only.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `alerts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRow {
    pub id: i64,
    pub post_id: i64,
    pub alert_type: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

/// Insert an alert and return the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_alert(
    pool: &PgPool,
    post_id: i64,
    alert_type: &str,
    message: &str,
) -> Result<AlertRow, DbError> {
    let row = sqlx::query_as::<_, AlertRow>(
        "INSERT INTO alerts (post_id, alert_type, message) \
         VALUES ($1, $2, $3) \
         RETURNING id, post_id, alert_type, message, sent_at",
    )
    .bind(post_id)
    .bind(alert_type)
    .bind(message)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// List recent alerts, newest first, optionally filtered by type.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_alerts(
    pool: &PgPool,
    limit: i64,
    alert_type: Option<&str>,
) -> Result<Vec<AlertRow>, DbError> {
    let rows = match alert_type {
        Some(kind) => {
            sqlx::query_as::<_, AlertRow>(
                "SELECT id, post_id, alert_type, message, sent_at \
                 FROM alerts \
                 WHERE alert_type = $1 \
                 ORDER BY sent_at DESC, id DESC \
                 LIMIT $2",
            )
            .bind(kind)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, AlertRow>(
                "SELECT id, post_id, alert_type, message, sent_at \
                 FROM alerts \
                 ORDER BY sent_at DESC, id DESC \
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
