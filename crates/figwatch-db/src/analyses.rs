//! Database operations for the `post_analyses` table.
//!
//! One analysis per post, written once after the analyzer completes and
//! immutable thereafter.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `post_analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub post_id: i64,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub summary: String,
    pub context: String,
    pub tags: Value,
    pub created_at: DateTime<Utc>,
}

/// Analyzer output ready to be persisted against a post.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub post_id: i64,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub summary: String,
    pub context: String,
    /// JSON array of controlled-vocabulary tags.
    pub tags: Value,
}

/// Insert the analysis for a post and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including the unique
/// violation when an analysis already exists for the post).
pub async fn insert_analysis(pool: &PgPool, analysis: &NewAnalysis) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO post_analyses \
             (post_id, sentiment_label, sentiment_score, summary, context, tags) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(analysis.post_id)
    .bind(&analysis.sentiment_label)
    .bind(analysis.sentiment_score)
    .bind(&analysis.summary)
    .bind(&analysis.context)
    .bind(&analysis.tags)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Return the analysis attached to a post, or `None` if analysis never ran.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_analysis_for_post(
    pool: &PgPool,
    post_id: i64,
) -> Result<Option<AnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRow>(
        "SELECT id, post_id, sentiment_label, sentiment_score, summary, context, tags, created_at \
         FROM post_analyses \
         WHERE post_id = $1",
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
