//! Database operations for the `posts` table.
//!
//! `platform_post_id` is the dedup key: [`insert_post`] is a no-op returning
//! the existing row when the id is already present, backed by the table's
//! UNIQUE constraint rather than the caller's check-then-insert alone.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub platform_post_id: String,
    pub content: String,
    pub figure_id: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub captured_at: DateTime<Utc>,
    pub impact_score: Option<f64>,
    pub likes: i32,
    pub retweets: i32,
    pub replies: i32,
}

/// A fetched post ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub platform_post_id: String,
    pub content: String,
    pub figure_id: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes: i32,
    pub retweets: i32,
    pub replies: i32,
}

/// A post joined with its author, as served by the latest-posts endpoint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LatestPostRow {
    pub id: i64,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub impact_score: Option<f64>,
    pub author_name: String,
    pub author_title: Option<String>,
}

const POST_COLUMNS: &str = "id, platform_post_id, content, figure_id, posted_at, captured_at, \
                            impact_score, likes, retweets, replies";

/// Check whether a post with this platform-native id is already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn post_exists(pool: &PgPool, platform_post_id: &str) -> Result<bool, DbError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE platform_post_id = $1)")
            .bind(platform_post_id)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

/// Insert a post, or return the existing row when the platform id is taken.
///
/// `ON CONFLICT DO NOTHING` keeps ingestion idempotent: re-inserting the same
/// `platform_post_id` never duplicates the post and never overwrites its
/// stored content.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or the conflict-path fetch fails.
pub async fn insert_post(pool: &PgPool, post: &NewPost) -> Result<PostRow, DbError> {
    let inserted = sqlx::query_as::<_, PostRow>(&format!(
        "INSERT INTO posts (platform_post_id, content, figure_id, posted_at, likes, retweets, replies) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (platform_post_id) DO NOTHING \
         RETURNING {POST_COLUMNS}"
    ))
    .bind(&post.platform_post_id)
    .bind(&post.content)
    .bind(post.figure_id)
    .bind(post.posted_at)
    .bind(post.likes)
    .bind(post.retweets)
    .bind(post.replies)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(row) => Ok(row),
        None => get_post_by_platform_id(pool, &post.platform_post_id)
            .await?
            .ok_or(DbError::NotFound),
    }
}

/// Fetch a post by its platform-native id, if present.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post_by_platform_id(
    pool: &PgPool,
    platform_post_id: &str,
) -> Result<Option<PostRow>, DbError> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE platform_post_id = $1"
    ))
    .bind(platform_post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Attach the derived impact score to a post. Happens once, after analysis.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the post does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_impact_score(pool: &PgPool, post_id: i64, score: f64) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE posts SET impact_score = $2 WHERE id = $1")
        .bind(post_id)
        .bind(score)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// List the most recent posts, optionally filtered by minimum impact score.
///
/// Ordered by `posted_at DESC` (nulls last) then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_latest_posts(
    pool: &PgPool,
    limit: i64,
    min_impact_score: Option<f64>,
) -> Result<Vec<PostRow>, DbError> {
    let rows = match min_impact_score {
        Some(min) => {
            sqlx::query_as::<_, PostRow>(&format!(
                "SELECT {POST_COLUMNS} FROM posts \
                 WHERE impact_score >= $1 \
                 ORDER BY posted_at DESC NULLS LAST, id DESC \
                 LIMIT $2"
            ))
            .bind(min)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, PostRow>(&format!(
                "SELECT {POST_COLUMNS} FROM posts \
                 ORDER BY posted_at DESC NULLS LAST, id DESC \
                 LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}

const LATEST_POST_COLUMNS: &str = "p.id, p.content, p.posted_at, p.impact_score, \
                                   f.name AS author_name, f.title AS author_title";

/// Like [`list_latest_posts`], joined with each post's author.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_latest_posts_with_author(
    pool: &PgPool,
    limit: i64,
    min_impact_score: Option<f64>,
) -> Result<Vec<LatestPostRow>, DbError> {
    let rows = match min_impact_score {
        Some(min) => {
            sqlx::query_as::<_, LatestPostRow>(&format!(
                "SELECT {LATEST_POST_COLUMNS} FROM posts p \
                 JOIN monitored_figures f ON f.id = p.figure_id \
                 WHERE p.impact_score >= $1 \
                 ORDER BY p.posted_at DESC NULLS LAST, p.id DESC \
                 LIMIT $2"
            ))
            .bind(min)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, LatestPostRow>(&format!(
                "SELECT {LATEST_POST_COLUMNS} FROM posts p \
                 JOIN monitored_figures f ON f.id = p.figure_id \
                 ORDER BY p.posted_at DESC NULLS LAST, p.id DESC \
                 LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
