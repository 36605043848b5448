use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{map_db_error, normalize_limit, ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct LatestPostItem {
    pub id: i64,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub impact_score: Option<f64>,
    pub author: AuthorItem,
}

#[derive(Debug, Serialize)]
pub(super) struct AuthorItem {
    pub name: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatestPostsQuery {
    pub limit: Option<i64>,
    pub min_impact_score: Option<f64>,
}

pub(super) async fn list_latest_posts(
    State(state): State<AppState>,
    Query(query): Query<LatestPostsQuery>,
) -> Result<Json<Vec<LatestPostItem>>, ApiError> {
    let rows = figwatch_db::list_latest_posts_with_author(
        &state.pool,
        normalize_limit(query.limit),
        query.min_impact_score,
    )
    .await
    .map_err(|e| map_db_error(&e))?;

    let data = rows
        .into_iter()
        .map(|row| LatestPostItem {
            id: row.id,
            content: row.content,
            posted_at: row.posted_at,
            impact_score: row.impact_score,
            author: AuthorItem {
                name: row.author_name,
                title: row.author_title,
            },
        })
        .collect();

    Ok(Json(data))
}
